//! NPC archetypes. The id of each entry is what the passenger manifest stores.

use crate::shared::*;

const ARCHETYPES: &[(&str, &str, (f32, f32, f32))] = &[
    ("gentleman", "Gentleman", (0.20, 0.20, 0.35)),
    ("lady", "Lady", (0.70, 0.30, 0.50)),
    ("farmer", "Farmer", (0.45, 0.60, 0.25)),
    ("milkmaid", "Milkmaid", (0.90, 0.85, 0.70)),
    ("fisherman", "Fisherman", (0.25, 0.45, 0.60)),
    ("schoolboy", "Schoolboy", (0.80, 0.55, 0.20)),
    ("clergyman", "Clergyman", (0.10, 0.10, 0.10)),
    ("miner", "Miner", (0.40, 0.35, 0.30)),
    ("quarryman", "Quarryman", (0.60, 0.60, 0.55)),
    ("widow", "Widow", (0.30, 0.25, 0.30)),
    ("clerk", "Clerk", (0.55, 0.45, 0.70)),
];

pub fn populate_archetypes(registry: &mut ArchetypeRegistry) {
    for &(id, name, tint) in ARCHETYPES {
        registry.insert(ArchetypeDef {
            id: ArchetypeId::new(id),
            name: name.to_string(),
            tint,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_ids_are_unique() {
        let mut registry = ArchetypeRegistry::default();
        populate_archetypes(&mut registry);
        assert_eq!(registry.archetypes.len(), ARCHETYPES.len());
    }
}
