//! Brush resolution and the single-hand painting primitive.

use crate::domain::{ActionMix, Brush, FrequencyEntry, Hand, HandFrequencies, ModelError};

/// How a brush stroke treats a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    /// Clear if the hand has entries, otherwise paint. Discrete clicks only.
    Toggle,
    /// Overwrite the hand with the brush's entries.
    ForceAdd,
    /// Remove the hand (no decision).
    ForceRemove,
}

/// Entries the brush writes to a hand. `None` when a mix brush points at a
/// mix that no longer exists.
pub fn resolve_brush_to_entries(brush: Brush, mixes: &[ActionMix]) -> Option<Vec<FrequencyEntry>> {
    match brush {
        Brush::Simple(action_id) => Some(vec![FrequencyEntry::full(action_id)]),
        Brush::Mix(mix_id) => mixes.iter().find(|m| m.id == mix_id).map(ActionMix::entries),
    }
}

/// Applies already-resolved brush `entries` to `hand`.
///
/// Returns whether the map changed.
pub fn apply_brush_to_hand(
    freqs: &mut HandFrequencies,
    hand: Hand,
    entries: &[FrequencyEntry],
    mode: PaintMode,
) -> Result<bool, ModelError> {
    let mode = match mode {
        PaintMode::Toggle if freqs.contains(hand) => PaintMode::ForceRemove,
        PaintMode::Toggle => PaintMode::ForceAdd,
        fixed => fixed,
    };
    match mode {
        PaintMode::ForceRemove => Ok(freqs.clear(hand).is_some()),
        _ => {
            if freqs.get(hand) == Some(entries) {
                return Ok(false);
            }
            freqs.set(hand, entries.to_vec())?;
            Ok(true)
        }
    }
}

/// Mode a drag starting on `hand` is fixed to.
///
/// A hand that already carries what the brush would paint starts an erase
/// drag; anything else starts a paint drag.
pub fn drag_mode_for(freqs: &HandFrequencies, hand: Hand, entries: &[FrequencyEntry]) -> PaintMode {
    if freqs.carries(hand, entries) {
        PaintMode::ForceRemove
    } else {
        PaintMode::ForceAdd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionId, MixId, Weight};
    use rstest::rstest;
    use ulid::Ulid;

    fn hand(label: &str) -> Hand {
        label.parse().unwrap()
    }

    fn raise() -> ActionId {
        ActionId::from_ulid(Ulid::from_parts(1, 1))
    }

    fn call() -> ActionId {
        ActionId::from_ulid(Ulid::from_parts(1, 2))
    }

    #[test]
    fn simple_brush_resolves_to_full_weight() {
        assert_eq!(
            resolve_brush_to_entries(Brush::Simple(raise()), &[]),
            Some(vec![FrequencyEntry::full(raise())])
        );
    }

    #[test]
    fn mix_brush_resolves_through_the_mix_list() {
        let mix = ActionMix {
            id: MixId::from_ulid(Ulid::new()),
            first: raise(),
            second: Some(call()),
            weight: Weight::new(70).unwrap(),
        };
        let entries = resolve_brush_to_entries(Brush::Mix(mix.id), std::slice::from_ref(&mix)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(resolve_brush_to_entries(Brush::Mix(MixId::from_ulid(Ulid::new())), &[mix]), None);
    }

    #[rstest]
    #[case::empty_hand(false)]
    #[case::painted_hand(true)]
    fn force_remove_leaves_the_hand_absent(#[case] painted: bool) {
        let mut freqs = HandFrequencies::new();
        if painted {
            freqs.set(hand("AA"), vec![FrequencyEntry::full(call())]).unwrap();
        }
        let changed = apply_brush_to_hand(
            &mut freqs,
            hand("AA"),
            &[FrequencyEntry::full(raise())],
            PaintMode::ForceRemove,
        )
        .unwrap();
        assert_eq!(changed, painted);
        assert!(!freqs.contains(hand("AA")));
        assert_eq!(freqs.get(hand("AA")), None);
    }

    #[test]
    fn force_add_overwrites_other_actions() {
        let mut freqs = HandFrequencies::new();
        freqs.set(hand("AA"), vec![FrequencyEntry::full(call())]).unwrap();
        let entries = [FrequencyEntry::full(raise())];

        assert!(apply_brush_to_hand(&mut freqs, hand("AA"), &entries, PaintMode::ForceAdd).unwrap());
        assert_eq!(freqs.get(hand("AA")), Some(&entries[..]));
        assert!(!apply_brush_to_hand(&mut freqs, hand("AA"), &entries, PaintMode::ForceAdd).unwrap());
    }

    #[test]
    fn toggle_alternates() {
        let mut freqs = HandFrequencies::new();
        let entries = [FrequencyEntry::full(raise())];

        apply_brush_to_hand(&mut freqs, hand("AA"), &entries, PaintMode::Toggle).unwrap();
        assert_eq!(freqs.get(hand("AA")), Some(&entries[..]));
        apply_brush_to_hand(&mut freqs, hand("AA"), &entries, PaintMode::Toggle).unwrap();
        assert!(!freqs.contains(hand("AA")));
    }

    #[test]
    fn toggle_clears_a_hand_painted_with_another_action() {
        let mut freqs = HandFrequencies::new();
        freqs.set(hand("AA"), vec![FrequencyEntry::full(call())]).unwrap();

        apply_brush_to_hand(&mut freqs, hand("AA"), &[FrequencyEntry::full(raise())], PaintMode::Toggle)
            .unwrap();
        assert!(!freqs.contains(hand("AA")));
    }

    #[test]
    fn drag_mode_depends_on_what_the_first_hand_carries() {
        let mut freqs = HandFrequencies::new();
        let entries = [FrequencyEntry::full(raise())];
        assert_eq!(drag_mode_for(&freqs, hand("AA"), &entries), PaintMode::ForceAdd);

        freqs.set(hand("AA"), entries.to_vec()).unwrap();
        assert_eq!(drag_mode_for(&freqs, hand("AA"), &entries), PaintMode::ForceRemove);

        freqs.set(hand("KK"), vec![FrequencyEntry::full(call())]).unwrap();
        assert_eq!(drag_mode_for(&freqs, hand("KK"), &entries), PaintMode::ForceAdd);
    }
}
