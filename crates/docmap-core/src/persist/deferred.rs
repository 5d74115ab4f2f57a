use crate::{
    ledger::ChangeEntry,
    value::{DocumentHandle, Value},
};

///
/// DeferredUpdate
///
/// A field left out of an insert because it references a document with no
/// identifier yet. The unit-of-work replays it as an update once the target
/// has been inserted.
///

#[derive(Clone, Debug, PartialEq)]
pub struct DeferredUpdate {
    pub document: DocumentHandle,
    pub field_name: String,
    pub value: Value,
}

impl DeferredUpdate {
    #[must_use]
    pub const fn new(document: DocumentHandle, field_name: String, value: Value) -> Self {
        Self {
            document,
            field_name,
            value,
        }
    }

    /// Change to replay through the update compiler: `(Null, pending)`.
    #[must_use]
    pub fn change_entry(&self) -> ChangeEntry {
        ChangeEntry::new(Value::Null, self.value.clone())
    }
}
