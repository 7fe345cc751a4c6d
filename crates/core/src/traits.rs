use crate::index::Location;
use crate::models::{Document, Section};

pub trait SectionLookup {
    fn resolve(&self, location: &Location) -> Option<(&Document, &Section)>;
}
