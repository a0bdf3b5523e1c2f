//! Passenger manifest: the handoff buffer that carries seated passengers
//! across a level load.
//!
//! Bevy resources outlive every entity despawned by a level load, so the
//! manifest needs no special treatment to survive one. It is written when an
//! NPC takes a seat and drained exactly once by seat reconstruction in the
//! destination level.

use bevy::prelude::*;
use crate::shared::*;

pub struct ManifestPlugin;

impl Plugin for ManifestPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PassengerManifest>();
    }
}

/// One ordered list of archetype ids per carriage class.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct PassengerManifest {
    pub class_a: Vec<ArchetypeId>,
    pub class_b: Vec<ArchetypeId>,
}

impl PassengerManifest {
    pub fn passengers(&self, class: CarriageClass) -> &[ArchetypeId] {
        match class {
            CarriageClass::ClassA => &self.class_a,
            CarriageClass::ClassB => &self.class_b,
        }
    }

    fn list_mut(&mut self, class: CarriageClass) -> &mut Vec<ArchetypeId> {
        match class {
            CarriageClass::ClassA => &mut self.class_a,
            CarriageClass::ClassB => &mut self.class_b,
        }
    }

    /// Append a freshly seated passenger.
    pub fn record(&mut self, class: CarriageClass, archetype: ArchetypeId) {
        debug!("[Manifest] {:?} += {}", class, archetype);
        self.list_mut(class).push(archetype);
    }

    /// Take both lists, leaving the manifest empty.
    pub fn drain(&mut self) -> Vec<(CarriageClass, ArchetypeId)> {
        let mut out = Vec::with_capacity(self.len());
        for class in CarriageClass::ALL {
            out.extend(self.list_mut(class).drain(..).map(|id| (class, id)));
        }
        out
    }

    pub fn len(&self) -> usize {
        self.class_a.len() + self.class_b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.class_a.is_empty() && self.class_b.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_order_per_class() {
        let mut manifest = PassengerManifest::default();
        manifest.record(CarriageClass::ClassB, ArchetypeId::new("farmer"));
        manifest.record(CarriageClass::ClassA, ArchetypeId::new("lady"));
        manifest.record(CarriageClass::ClassA, ArchetypeId::new("gentleman"));

        assert_eq!(
            manifest.passengers(CarriageClass::ClassA),
            &[ArchetypeId::new("lady"), ArchetypeId::new("gentleman")]
        );
        assert_eq!(manifest.passengers(CarriageClass::ClassB).len(), 1);
        assert_eq!(manifest.len(), 3);
    }

    #[test]
    fn test_drain_empties_and_yields_class_a_first() {
        let mut manifest = PassengerManifest::default();
        manifest.record(CarriageClass::ClassB, ArchetypeId::new("farmer"));
        manifest.record(CarriageClass::ClassA, ArchetypeId::new("lady"));

        let drained = manifest.drain();
        assert_eq!(
            drained,
            vec![
                (CarriageClass::ClassA, ArchetypeId::new("lady")),
                (CarriageClass::ClassB, ArchetypeId::new("farmer")),
            ]
        );
        assert!(manifest.is_empty());
        assert!(manifest.drain().is_empty(), "second drain yields nothing");
    }
}
