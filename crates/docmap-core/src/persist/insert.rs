use crate::{
    error::TranslateError,
    model::ClassMetadata,
    obs::sink::{self, TranslateEvent},
    persist::{DeferredUpdate, Persister, Prepared, identifier_kind, write_key},
    value::Document,
    wire::{WireDocument, WireValue},
};

///
/// InsertOutcome
///

#[derive(Clone, Debug, PartialEq)]
pub struct InsertOutcome {
    pub document: WireDocument,
    /// Fields excluded because of forward references, in field order.
    pub deferred: Vec<DeferredUpdate>,
}

impl Persister<'_> {
    /// Compile the full insert document for a snapshot.
    ///
    /// Non-nullable absent fields are omitted. A field whose value holds a
    /// reference without an identifier is excluded and returned as a
    /// [`DeferredUpdate`] instead.
    pub fn compile_insert(&self, document: &Document) -> Result<InsertOutcome, TranslateError> {
        let class = self.class_of(document)?;
        let outcome = self
            .insert_fields(class, document)
            .map_err(|err| Self::observe_failure(class, err))?;

        sink::record(TranslateEvent::InsertCompiled {
            class: class.name(),
            fields: outcome.document.len() as u64,
            deferred: outcome.deferred.len() as u64,
        });

        Ok(outcome)
    }

    fn insert_fields(
        &self,
        class: &ClassMetadata,
        document: &Document,
    ) -> Result<InsertOutcome, TranslateError> {
        let mut out = WireDocument::new();
        let mut deferred = Vec::new();

        for field in class.fields() {
            if field.not_saved {
                continue;
            }

            if field.is_identifier {
                let Some(id) = self.identifier_of(class, document) else {
                    continue;
                };
                let kind = identifier_kind(class, field)?;
                let id = self
                    .converters
                    .to_wire(kind, &id)
                    .map_err(|err| TranslateError::from(err).with_field(&field.name))?;
                write_key(class, &mut out, self.config.identifier_field.clone(), id)?;
                continue;
            }

            let value = document.field(&field.field_name);
            if value.is_null() && !field.nullable {
                continue;
            }

            match self
                .prepare_value(field, value)
                .map_err(|err| err.with_field(&field.name))?
            {
                Prepared::Deferred { .. } => {
                    sink::record(TranslateEvent::ReferenceDeferred {
                        class: class.name(),
                        field: &field.field_name,
                    });
                    deferred.push(DeferredUpdate::new(
                        document.handle(),
                        field.field_name.clone(),
                        value.clone(),
                    ));
                }
                Prepared::Value(wire) => {
                    if wire.is_null() && !field.nullable {
                        continue;
                    }
                    write_key(class, &mut out, field.name.clone(), wire)?;
                }
            }
        }

        if let Some(discriminator) = class.discriminator() {
            write_key(
                class,
                &mut out,
                discriminator.field.clone(),
                WireValue::Text(discriminator.value.clone()),
            )?;
        }

        Ok(InsertOutcome {
            document: out,
            deferred,
        })
    }
}
