use karst_blocks::{BlockType, FaceRole, TextureCatalog};
use proptest::prelude::*;

fn arb_type() -> impl Strategy<Value = BlockType> {
    prop_oneof![
        Just(BlockType::Air),
        Just(BlockType::Grass),
        Just(BlockType::Dirt),
        Just(BlockType::Stone),
        Just(BlockType::Sand),
        Just(BlockType::Snow),
        Just(BlockType::Water),
    ]
}

proptest! {
    // Face culling across any cell pair: two solids never face each other,
    // and a solid/non-solid pair puts the face on the solid side only.
    #[test]
    fn solid_pairs_cull_and_mixed_pairs_emit_one_side(a in arb_type(), b in arb_type()) {
        if a.is_solid() && b.is_solid() {
            prop_assert!(!a.emits_face_toward(b));
            prop_assert!(!b.emits_face_toward(a));
        }
        if a.is_solid() != b.is_solid() {
            let (solid, other) = if a.is_solid() { (a, b) } else { (b, a) };
            prop_assert!(solid.emits_face_toward(other));
            // The non-solid side answers back only for water against air,
            // which cannot happen here since one side is solid.
            prop_assert!(!other.emits_face_toward(solid));
        }
        // Air is inert in both directions.
        prop_assert!(!BlockType::Air.emits_face_toward(a));
    }

    // Every id the catalog can hand out fits the packed-vertex field.
    #[test]
    fn default_catalog_ids_fit_four_bits(ty in arb_type()) {
        let cat = TextureCatalog::default();
        for role in [FaceRole::Top, FaceRole::Bottom, FaceRole::Side] {
            prop_assert!(cat.texture_id(ty, role) <= karst_blocks::types::MAX_TEXTURE_ID);
        }
    }
}
