//! Relocation of template activities

use crate::model::{new_code, Activity};

/// Deep copy of `activity` moved to `location`, with a fresh code.
///
/// The production flow follows the new location and loses its link to the
/// template's own record. Technosphere exchanges are left untouched; they
/// still point at the template's suppliers until re-linked.
pub fn copy_to_new_location(activity: &Activity, location: &str) -> Activity {
    let mut copy = activity.clone();
    copy.code = new_code();
    copy.location = location.to_string();
    for exc in copy.production_mut() {
        exc.location = Some(location.to_string());
        exc.input = None;
    }
    copy
}
