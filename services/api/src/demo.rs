use crate::infra::{assessor, hanke_service, layer_source};
use chrono::{TimeZone, Utc};
use clap::Args;
use haitaton::config::AppConfig;
use haitaton::disruption::{
    CsvLayerSource, DisruptionDimension, GeometrySetId, HankeDisruption,
};
use haitaton::error::AppError;
use haitaton::hanke::{
    Actor, ContactDetails, ContactInput, ContactRole, Hanke, HankeInput, Patch, SaveType,
    WorkSiteType,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// CSV export of spatial layer overlaps
    #[arg(long)]
    pub(crate) layers: PathBuf,
    /// Geometry set to classify
    #[arg(long)]
    pub(crate) geometry_set: i64,
    /// Print the classification as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// User recorded as creator and modifier of the demo hanke
    #[arg(long, default_value = "haitaton-demo")]
    pub(crate) actor: String,
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let source = layer_source(Some(&args.layers))?;
    let assessor = assessor(source, config.classification);

    let geometry_set = GeometrySetId(args.geometry_set);
    let disruption = assessor.assess(geometry_set)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&disruption).map_err(std::io::Error::other)?;
        println!("{rendered}");
    } else {
        render_disruption(geometry_set, &disruption);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let actor = Actor::new(args.actor);
    let service = hanke_service(&config.hanke);

    println!("Haitaton hanke demo");

    let created = service.create(demo_hanke(), &actor)?;
    render_hanke("Created", &created);

    let mut update = HankeInput {
        tunnus: Some(created.tunnus.clone()),
        description: Patch::Clear,
        save_type: Patch::Set(SaveType::Submit),
        work_site_types: created.fields.work_site_types.clone(),
        ..HankeInput::default()
    };
    // Keep the owner with a new phone number, drop the implementer, add an assessor.
    update.owners = created
        .owners
        .iter()
        .map(|entry| ContactInput {
            id: Some(entry.id),
            details: ContactDetails {
                phone: "09 310 1234".to_string(),
                ..entry.details.clone()
            },
        })
        .collect();
    update.assessors = vec![contact("Sanna", "Laine", "sanna.laine@example.fi", "040 555 0101")];

    let updated = service.update(update, &actor)?;
    render_hanke("Updated", &updated);

    let source = CsvLayerSource::from_reader(DEMO_LAYERS.as_bytes())?;
    let assessor = assessor(source, config.classification);
    let geometry_set = GeometrySetId(1);
    let disruption = assessor.assess(geometry_set)?;
    render_disruption(geometry_set, &disruption);

    Ok(())
}

fn demo_hanke() -> HankeInput {
    let start = Utc.with_ymd_and_hms(2025, 5, 5, 6, 0, 0).single();
    let end = Utc.with_ymd_and_hms(2025, 8, 29, 15, 0, 0).single();

    HankeInput {
        name: Patch::Set("Hämeentien kaukolämpösaneeraus".to_string()),
        description: Patch::Set("Kaukolämpöjohdon uusiminen välillä Sörnäinen-Vallila".to_string()),
        start_date: start.into(),
        end_date: end.into(),
        street_address: Patch::Set("Hämeentie 40".to_string()),
        save_type: Patch::Set(SaveType::Draft),
        work_site_types: [WorkSiteType::DistrictHeating, WorkSiteType::StreetConstruction]
            .into_iter()
            .collect(),
        owners: vec![contact("Aino", "Virta", "aino.virta@example.fi", "09 310 0000")],
        implementers: vec![
            contact("Mikko", "Koski", "mikko.koski@example.fi", "040 555 0100"),
            contact("", "", "", ""),
        ],
        ..HankeInput::default()
    }
}

fn contact(first: &str, last: &str, email: &str, phone: &str) -> ContactInput {
    ContactInput {
        id: None,
        details: ContactDetails {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            ..ContactDetails::default()
        },
    }
}

fn render_hanke(heading: &str, hanke: &Hanke) {
    println!("\n{heading} {} (version {})", hanke.tunnus, hanke.version);
    println!(
        "- {} | {} - {}",
        hanke.fields.name.as_deref().unwrap_or("(unnamed)"),
        hanke
            .fields
            .start_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "?".to_string()),
        hanke
            .fields
            .end_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "?".to_string()),
    );
    println!(
        "- save type {:?} | description {}",
        hanke.fields.save_type,
        if hanke.fields.description.is_some() {
            "set"
        } else {
            "cleared"
        }
    );
    for role in ContactRole::ordered() {
        for entry in hanke.contacts(role) {
            println!(
                "  - {} #{}: {} {} <{}> {}",
                role.label(),
                entry.id,
                entry.details.first_name,
                entry.details.last_name,
                entry.details.email,
                entry.details.phone
            );
        }
    }
}

fn render_disruption(geometry_set: GeometrySetId, disruption: &HankeDisruption) {
    println!("\nTraffic disruption for geometry set {geometry_set}");
    println!("geometry   street  volume  bus  tram  cycle");
    for (geometry, profile) in &disruption.geometries {
        println!(
            "{:<10} {:>6}  {:>6}  {:>3}  {:>4}  {:>5}",
            geometry.to_string(),
            profile.street_class.to_string(),
            profile.traffic_volume.to_string(),
            profile.bus.to_string(),
            profile.tram.to_string(),
            profile.cycle_route.to_string()
        );
    }
    for dimension in DisruptionDimension::ALL {
        println!(
            "- {:?}: {}",
            dimension,
            disruption.profile.get(dimension)
        );
    }
    println!("worst dimension value: {}", disruption.worst);
}

const DEMO_LAYERS: &str = "\
layer,radius,feature_id,geometry_set_id,geometry_id,value,route_id,direction_id,rush_hour,trunk
ylre_parts,,101,1,11,1,,,,
street_classes,,102,1,11,Alueellinen kokoojakatu,,,,
ylre_classes,,103,1,12,Tonttikatu tai ajoyhteys,,,,
central_business_area,,104,1,12,1,,,,
volumes,15,105,1,11,900,,,,
volumes,30,106,1,11,7400,,,,
volumes,15,107,1,12,320,,,,
buses,,108,1,11,,55,1,14,no
buses,,109,1,11,,71,0,9,almost
trams,,110,1,11,shared,,,,
cycleways,,111,1,12,main,,,,
";
