use crate::{
    error::TranslateError,
    model::Association,
    persist::{Persister, Prepared, identifier_kind, write_key},
    value::Document,
    wire::{WireDocument, WireValue},
};

impl Persister<'_> {
    /// Build the full wire form of an embedded document.
    ///
    /// Follows the insert omission rules. When the association does not pin
    /// a target class, the discriminator of the concrete class is appended.
    /// A deferred reference anywhere inside defers the whole value.
    pub fn materialize_embedded(
        &self,
        association: &Association,
        document: &Document,
    ) -> Result<Prepared, TranslateError> {
        let class = self.class_of(document)?;
        let mut out = WireDocument::new();

        for field in class.fields() {
            if field.not_saved {
                continue;
            }
            let value = document.field(&field.field_name);
            if value.is_null() && !field.nullable {
                continue;
            }

            if field.is_identifier {
                let kind = identifier_kind(class, field)?;
                let id = self
                    .converters
                    .to_wire(kind, value)
                    .map_err(|err| TranslateError::from(err).with_field(&field.name))?;
                write_key(class, &mut out, self.config.identifier_field.clone(), id)?;
                continue;
            }

            match self
                .prepare_value(field, value)
                .map_err(|err| err.with_field(&field.name))?
            {
                Prepared::Deferred { class } => return Ok(Prepared::Deferred { class }),
                Prepared::Value(wire) => {
                    if wire.is_null() && !field.nullable {
                        continue;
                    }
                    write_key(class, &mut out, field.name.clone(), wire)?;
                }
            }
        }

        if !association.is_pinned() {
            let key = association.discriminator_field_or(&self.config.discriminator_field);
            let code = association.discriminator_value(class.name())?;
            write_key(class, &mut out, key, WireValue::Text(code.to_string()))?;
        }

        Ok(Prepared::Value(WireValue::Document(out)))
    }
}
