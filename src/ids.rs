//! Generation of record ids.

use uuid::Uuid;

/// Produces fresh, unique, opaque record ids.
pub trait IdGenerator {
    fn generate_id(&mut self) -> String;
}

/// The default generator: a random (v4) UUID per id.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn generate_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Hands out `{prefix}-1`, `{prefix}-2`, ... which keeps test expectations readable.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn generate_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[test]
fn uuid_ids_are_unique() {
    let mut ids = UuidIds;
    assert_ne!(ids.generate_id(), ids.generate_id());
}

#[test]
fn sequential_ids() {
    let mut ids = SequentialIds::new("t");
    assert_eq!(ids.generate_id(), "t-1");
    assert_eq!(ids.generate_id(), "t-2");
}
