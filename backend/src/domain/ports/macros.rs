//! `define_port_error!` builds a `thiserror` enum plus one snake_case
//! constructor per variant, taking `impl Into<T>` for each field.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum PantryPortError {
            Offline { message: String } => "offline: {message}",
            Missing { id: i64 } => "missing: {id}",
            Partial { message: String, id: i64 } => "partial: {message} ({id})",
            Unknown => "unknown",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(PantryPortError::offline("db down").to_string(), "offline: db down");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        assert_eq!(PantryPortError::missing(42_i64).to_string(), "missing: 42");
    }

    #[test]
    fn mixed_fields_are_supported() {
        assert_eq!(
            PantryPortError::partial("tags", 7_i64).to_string(),
            "partial: tags (7)"
        );
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(PantryPortError::unknown(), PantryPortError::Unknown);
    }
}
