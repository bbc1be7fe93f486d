//! Run-end report of the metal exchanges changed

use crate::stamp::MetalStamp;
use lcigraph_db::Database;

pub const REPORT_HEADER: [&str; 8] = [
    "dataset name",
    "dataset product",
    "dataset location",
    "metal",
    "old value",
    "new value",
    "DLR variable",
    "DLR metal",
];

/// One row per stamped biosphere exchange, in database order.
pub fn modified_rows(db: &Database) -> Vec<[String; 8]> {
    let mut rows = Vec::new();
    for ds in db.iter() {
        for exc in ds.biosphere() {
            let Some(stamp) = exc.comment.as_deref().and_then(MetalStamp::parse) else {
                continue;
            };
            rows.push([
                ds.name.clone(),
                ds.reference_product.clone(),
                ds.location.clone(),
                exc.name.clone(),
                stamp.old.to_string(),
                stamp.new.to_string(),
                stamp.technology,
                stamp.metal,
            ]);
        }
    }
    rows
}
