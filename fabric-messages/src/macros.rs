/// Build a message from a template, optionally binding `key = value` pairs.
///
/// ```rust
/// use fabric_messages::{msg, MESSAGES};
///
/// let text = msg!(MESSAGES.workspace.found, name = "W", id = "ws-5");
/// assert!(text.contains("ws-5"));
/// ```
#[macro_export]
macro_rules! msg {
    ($template:expr) => {
        $crate::builder::MessageBuilder::new($template).build()
    };
    ($template:expr, $($key:ident = $value:expr),+ $(,)?) => {
        {
            let mut builder = $crate::builder::MessageBuilder::new($template);
            $(
                builder = builder.var(stringify!($key), $value);
            )+
            builder.build()
        }
    };
}
