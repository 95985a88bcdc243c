use super::splice::{remove_subtree, removal_path};
use super::{skipped, Coordinate, Engine, Outcome, SkipReason};
use crate::clock::Clock;
use crate::errors::EditorError;
use crate::store::DocumentStore;
use tracing::{info, instrument};

impl<C: Clock> Engine<C> {
    /// Remove the element at `at`
    ///
    /// Erasing the last item of a list removes the list. Style slots of every
    /// removed occurrence are dropped so later elements keep their overrides.
    #[instrument(skip(self, store), fields(at = %at))]
    pub fn erase_element(
        &self,
        store: &mut impl DocumentStore,
        at: &Coordinate,
    ) -> Result<Outcome, EditorError> {
        let Some(field) = store.get(&at.fragment_id) else {
            return Ok(skipped(
                "erase",
                SkipReason::MissingFragment(at.fragment_id.clone()),
            ));
        };

        let mut doc = field.current.clone();
        let Some(path) = removal_path(&doc.semantic, at.outer_idx, at.idx) else {
            return Ok(skipped("erase", SkipReason::MissingTarget));
        };
        if remove_subtree(&mut doc, &path).is_none() {
            return Ok(skipped("erase", SkipReason::MissingTarget));
        }
        doc.sync()?;

        self.commit(store, at, field, doc)?;
        info!(?path, "Erased element");
        Ok(Outcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::EditorConfig;
    use crate::document::Document;
    use crate::store::MemoryStore;

    #[test]
    fn test_erase_restoring_original_clears_unsaved() {
        let engine = Engine::with_clock(EditorConfig::default(), ManualClock::new(10_000));
        let mut store = MemoryStore::new();
        store.insert("f", Document::from_markdown("a\n\nb").unwrap());

        engine
            .erase_element(&mut store, &Coordinate::block("f", "p", 1))
            .unwrap();
        assert_eq!(store.current("f").unwrap().source, "a");
        assert!(store.is_unsaved("p"));

        let outcome = engine
            .erase_element(&mut store, &Coordinate::item("f", "p", 0, 0))
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::MissingTarget));
    }

    #[test]
    fn test_erase_item_from_longer_list() {
        let engine = Engine::with_clock(EditorConfig::default(), ManualClock::new(10_000));
        let mut store = MemoryStore::new();
        store.insert("f", Document::from_markdown("1. a\n2. b\n3. c").unwrap());

        engine
            .erase_element(&mut store, &Coordinate::item("f", "p", 0, 1))
            .unwrap();
        assert_eq!(store.current("f").unwrap().source, "1. a\n2. c");
    }
}
