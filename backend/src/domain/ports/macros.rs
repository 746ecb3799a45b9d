//! Helper macro for generating domain port error enums.
//!
//! Every port error here is a set of failure categories that each carry a
//! human-readable message. The macro expands the `thiserror` plumbing and a
//! snake_case constructor per variant, so adapters write
//! `DonationStoreError::query("...")` instead of spelling out struct
//! variants.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $display:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant {
                    /// Underlying failure description.
                    message: String,
                },
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = concat!(
                        "Construct [`", stringify!($name), "::", stringify!($variant), "`]."
                    )]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    define_port_error! {
        /// Example error used only by this test.
        pub enum ExamplePortError {
            /// Pipe variant.
            Pipe => "pipe burst: {message}",
            /// Two-word variant exercising the snake_case constructor.
            DeadLetter => "dead letter: {message}",
        }
    }

    #[test]
    fn constructors_accept_str_and_render_messages() {
        let err = ExamplePortError::pipe("under the sink");
        assert_eq!(err.to_string(), "pipe burst: under the sink");
    }

    #[test]
    fn multi_word_variants_get_snake_case_constructors() {
        let err = ExamplePortError::dead_letter("no consumer");
        assert_eq!(err.to_string(), "dead letter: no consumer");
        assert!(matches!(err, ExamplePortError::DeadLetter { .. }));
    }
}
