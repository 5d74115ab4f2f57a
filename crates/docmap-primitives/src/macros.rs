#[macro_export]
macro_rules! scalar_kind_registry_entries {
    ($macro:ident $(, @args $($args:tt)+ )?) => {
        $macro! {
            $(
                @args $($args)+;
            )?
            @entries
            (
                Bin,
                Binary,
                name = "bin",
                is_numeric = false,
                is_identifier_capable = false,
                is_container = false
            ),
            (
                Bool,
                Bool,
                name = "boolean",
                is_numeric = false,
                is_identifier_capable = false,
                is_container = false
            ),
            (
                Collection,
                Container,
                name = "collection",
                is_numeric = false,
                is_identifier_capable = false,
                is_container = true
            ),
            (
                Date,
                Temporal,
                name = "date",
                is_numeric = false,
                is_identifier_capable = false,
                is_container = false
            ),
            (
                Float,
                Numeric,
                name = "float",
                is_numeric = true,
                is_identifier_capable = false,
                is_container = false
            ),
            (
                Hash,
                Container,
                name = "hash",
                is_numeric = false,
                is_identifier_capable = false,
                is_container = true
            ),
            (
                Id,
                Identifier,
                name = "id",
                is_numeric = false,
                is_identifier_capable = true,
                is_container = false
            ),
            (
                Int,
                Numeric,
                name = "int",
                is_numeric = true,
                is_identifier_capable = true,
                is_container = false
            ),
            (
                Text,
                Textual,
                name = "string",
                is_numeric = false,
                is_identifier_capable = true,
                is_container = false
            ),
            (
                Timestamp,
                Temporal,
                name = "timestamp",
                is_numeric = false,
                is_identifier_capable = false,
                is_container = false
            ),
        }
    };
}

#[macro_export]
macro_rules! scalar_kind_registry {
    ($macro:ident) => {
        $crate::scalar_kind_registry_entries!($macro)
    };
    ($macro:ident, $($args:tt)+) => {
        $crate::scalar_kind_registry_entries!($macro, @args $($args)+)
    };
}

macro_rules! metadata_from_registry {
    ( @args $kind:expr; @entries $( ($scalar:ident, $family:ident, name = $name:expr, is_numeric = $is_numeric:expr, is_identifier_capable = $is_identifier_capable:expr, is_container = $is_container:expr) ),* $(,)? ) => {
        match $kind {
            $(
                $crate::ScalarKind::$scalar => $crate::ScalarMetadata {
                    family: $crate::ScalarFamily::$family,
                    name: $name,
                    is_numeric: $is_numeric,
                    is_identifier_capable: $is_identifier_capable,
                    is_container: $is_container,
                },
            )*
        }
    };
}

macro_rules! kind_from_name_registry {
    ( @args $name:expr; @entries $( ($scalar:ident, $family:ident, name = $kind_name:literal, is_numeric = $is_numeric:expr, is_identifier_capable = $is_identifier_capable:expr, is_container = $is_container:expr) ),* $(,)? ) => {
        match $name {
            $( $kind_name => Some($crate::ScalarKind::$scalar), )*
            _ => None,
        }
    };
}

macro_rules! all_kinds_from_registry {
    ( @entries $( ($scalar:ident, $family:ident, name = $name:expr, is_numeric = $is_numeric:expr, is_identifier_capable = $is_identifier_capable:expr, is_container = $is_container:expr) ),* $(,)? ) => {
        [ $( $crate::ScalarKind::$scalar ),* ]
    };
}
