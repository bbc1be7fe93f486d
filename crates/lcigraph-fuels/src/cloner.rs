//! Region-specific copies of template activities

use crate::Result;
use lcigraph_db::{copy_to_new_location, Activity, Database, Relinker};

/// Copy `template` into `region` and re-resolve its suppliers in `working`.
///
/// The copy gets a fresh code and loses the upstream link of its production
/// exchange. A supplier that cannot be resolved aborts the generation.
pub fn clone_to_region(
    template: &Activity,
    region: &str,
    working: &Database,
    relinker: &dyn Relinker,
) -> Result<Activity> {
    let mut activity = copy_to_new_location(template, region);
    relinker.relink(&mut activity, working)?;
    tracing::debug!(name = %activity.name, region = %region, "cloned activity");
    Ok(activity)
}
