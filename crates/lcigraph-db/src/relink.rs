//! Re-linking of technosphere exchanges
//!
//! Every technosphere exchange must resolve to exactly one supplier with the
//! same name and product. When several locations are available the supplier
//! is chosen by an ordered list of location strategies; the first strategy
//! that yields a candidate wins.

use crate::database::Database;
use crate::geomap::Geomap;
use crate::model::{Activity, Exchange};
use crate::{DbError, Result};

pub trait Relinker {
    /// Re-resolve every technosphere exchange of `activity` against `db`.
    fn relink(&self, activity: &mut Activity, db: &Database) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocationStrategy {
    /// The consuming activity's own location.
    Own,
    /// Ecoinvent locations covered by the consumer's location as IAM region.
    Mapped,
    /// Whatever location the exchange currently names.
    Current,
    RestOfWorld,
    Global,
    /// A single candidate, whatever its location.
    Sole,
}

const CASCADE: [LocationStrategy; 6] = [
    LocationStrategy::Own,
    LocationStrategy::Mapped,
    LocationStrategy::Current,
    LocationStrategy::RestOfWorld,
    LocationStrategy::Global,
    LocationStrategy::Sole,
];

#[derive(Debug, Clone)]
pub struct LocationCascadeRelinker<G> {
    geomap: G,
}

impl<G: Geomap> LocationCascadeRelinker<G> {
    pub fn new(geomap: G) -> Self {
        Self { geomap }
    }

    pub fn geomap(&self) -> &G {
        &self.geomap
    }

    /// Supplier for `exc` as consumed from `location`, if any.
    pub fn resolve<'a>(
        &self,
        location: &str,
        exc: &Exchange,
        db: &'a Database,
    ) -> Option<&'a Activity> {
        let candidates = db.candidates(&exc.name, exc.product.as_deref());
        if candidates.is_empty() {
            return None;
        }

        let at = |loc: &str| -> Option<&'a Activity> {
            candidates.iter().copied().find(|a| a.location == loc)
        };

        for strategy in CASCADE {
            let found = match strategy {
                LocationStrategy::Own => at(location),
                LocationStrategy::Mapped => self
                    .geomap
                    .iam_to_ecoinvent_locations(location)
                    .iter()
                    .find_map(|loc| at(loc.as_str())),
                LocationStrategy::Current => exc.location.as_deref().and_then(at),
                LocationStrategy::RestOfWorld => at("RoW"),
                LocationStrategy::Global => at("GLO"),
                LocationStrategy::Sole => (candidates.len() == 1).then(|| candidates[0]),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }
}

impl<G: Geomap> Relinker for LocationCascadeRelinker<G> {
    fn relink(&self, activity: &mut Activity, db: &Database) -> Result<()> {
        let location = activity.location.clone();
        for idx in 0..activity.exchanges.len() {
            if !activity.exchanges[idx].is_technosphere() {
                continue;
            }
            let supplier = self
                .resolve(&location, &activity.exchanges[idx], db)
                .ok_or_else(|| {
                    let exc = &activity.exchanges[idx];
                    DbError::Unresolved {
                        activity: activity.name.clone(),
                        location: location.clone(),
                        name: exc.name.clone(),
                        product: exc.product_or_empty().to_string(),
                    }
                })?;

            let exc = &mut activity.exchanges[idx];
            exc.location = Some(supplier.location.clone());
            exc.product = Some(supplier.reference_product.clone());
            exc.unit = supplier.unit.clone();
            exc.input = Some(supplier.input_ref());
        }
        Ok(())
    }
}
