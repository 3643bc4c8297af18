#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod errors;
pub mod statistics;
pub mod year_time;

#[macro_use]
extern crate is_close;

pub use crate::config::{DhwConfig, SynthesisConfig, VariabilityConfig};
pub use crate::core::base_data::{Sia2024BaseData, StaticBaseData};
pub use crate::core::building_type::{BuildingTypeDefinition, BuildingTypeKind};
pub use crate::core::parameter_set::{BuildingOperationParameters, OperationProfiles};
pub use crate::core::room_type::RoomType;
pub use crate::core::units::{Quantity, Unit};
pub use crate::errors::SynthesisError;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use tracing::{info, instrument, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Install a global `tracing` subscriber printing events up to `max_level`. The library itself
/// never installs one, so embedding binaries and tests decide where events go.
pub fn init_tracing(max_level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Synthesise the operation parameters of a single building, drawing any variability from `rng`.
#[instrument(skip_all, fields(building_type = %building_type.kind()))]
pub fn synthesize_building<B: Sia2024BaseData + ?Sized, R: Rng + ?Sized>(
    building_type: &BuildingTypeDefinition,
    base_data: &B,
    config: &SynthesisConfig,
    rng: &mut R,
) -> Result<BuildingOperationParameters, SynthesisError> {
    let parameters = BuildingOperationParameters::synthesize(building_type, base_data, config, rng)?;
    info!(
        area_per_person = %parameters.area_per_person,
        dhw_demand = %parameters.dhw_demand,
        ventilation_rate = %parameters.ventilation_rate,
        mean_occupancy = statistics::mean(&parameters.profiles.occupancy),
        "synthesised building operation parameters"
    );

    Ok(parameters)
}

/// Synthesise many buildings in parallel. Each building gets its own generators and random
/// stream, so a failing building leaves the others untouched; results are returned in input
/// order.
pub fn synthesize_buildings<B: Sia2024BaseData + ?Sized>(
    building_types: &[BuildingTypeDefinition],
    base_data: &B,
    config: &SynthesisConfig,
) -> Vec<Result<BuildingOperationParameters, SynthesisError>> {
    building_types
        .par_iter()
        .enumerate()
        .map(|(index, building_type)| {
            let mut rng = building_rng(config.seed, index);
            synthesize_building(building_type, base_data, config, &mut rng).inspect_err(|error| {
                warn!(index, building_type = %building_type.kind(), %error, "building synthesis failed");
            })
        })
        .collect()
}

fn building_rng(seed: Option<u64>, index: usize) -> Pcg64 {
    match seed {
        Some(seed) => Pcg64::seed_from_u64(seed.wrapping_add(index as u64)),
        None => Pcg64::from_rng(&mut rand::rng()),
    }
}
