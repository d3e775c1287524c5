//! Building blocks of the domain model: aggregates, entities and value
//! objects.
//!
//! Carts, products and orders are aggregates. Each one decides what happens
//! to a command in `handle`, producing events, and only changes state in
//! `apply`. The owning store or repository drives the two steps and takes
//! care of persistence and notification afterwards.

use core::fmt::Debug;
use core::hash::Hash;

/// Something with a stable identity and a change counter.
pub trait AggregateRoot {
    type Id: Clone + Eq + Hash + Debug;

    fn id(&self) -> &Self::Id;

    /// Number of events applied since the instance was created, loaded or
    /// seeded.
    fn version(&self) -> u64;
}

/// Command/event state machine.
///
/// `handle` never mutates; an empty event list means the command was a
/// no-op. `apply` must accept any event `handle` produced and bumps the
/// version by exactly one.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + Debug;
    type Event: Clone + Debug;
    type Error: Debug;

    fn apply(&mut self, event: &Self::Event);

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}

/// A record looked up by id inside an aggregate or catalog (a variant, a
/// category) without being an aggregate itself.
pub trait Entity {
    type Id: Clone + Eq + Hash + Debug;

    fn id(&self) -> &Self::Id;
}

/// First entity in `entities` with the given id.
pub fn find_by_id<'a, E: Entity>(entities: &'a [E], id: &E::Id) -> Option<&'a E> {
    entities.iter().find(|e| e.id() == id)
}

/// Compared by value; immutable once built.
///
/// `Money` and a cart line's identity key are value objects: two equal
/// instances are interchangeable, and "changing" one means building another
/// (`price.percent_off(15)` returns a new amount).
pub trait ValueObject: Clone + PartialEq + Debug {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row {
        id: u32,
        label: &'static str,
    }

    impl Entity for Row {
        type Id = u32;

        fn id(&self) -> &Self::Id {
            &self.id
        }
    }

    #[test]
    fn find_by_id_returns_first_match() {
        let rows = [
            Row { id: 1, label: "a" },
            Row { id: 2, label: "b" },
            Row { id: 2, label: "c" },
        ];
        assert_eq!(find_by_id(&rows, &2).map(|r| r.label), Some("b"));
        assert!(find_by_id(&rows, &3).is_none());
    }

    #[derive(Debug, Default)]
    struct Shelf {
        boxes: u32,
        version: u64,
    }

    impl AggregateRoot for Shelf {
        type Id = ();

        fn id(&self) -> &Self::Id {
            &()
        }

        fn version(&self) -> u64 {
            self.version
        }
    }

    impl Aggregate for Shelf {
        type Command = u32;
        type Event = u32;
        type Error = ();

        fn apply(&mut self, event: &u32) {
            self.boxes += event;
            self.version += 1;
        }

        fn handle(&self, command: &u32) -> Result<Vec<u32>, ()> {
            match *command {
                0 => Ok(vec![]),
                n if self.boxes + n > 10 => Err(()),
                n => Ok(vec![n]),
            }
        }
    }

    #[test]
    fn handle_decides_and_apply_counts_versions() {
        let mut shelf = Shelf::default();
        assert!(shelf.handle(&0).unwrap().is_empty());
        for event in shelf.handle(&4).unwrap() {
            shelf.apply(&event);
        }
        assert_eq!((shelf.boxes, shelf.version()), (4, 1));
        assert!(shelf.handle(&7).is_err());
        assert_eq!(shelf.boxes, 4);
    }
}
