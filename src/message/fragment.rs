//! Message fragments and their normalisation to text.
//!
//! # Responsibilities
//! - Accept the loose shapes callers log (text, numbers, JSON, errors, lists)
//! - Turn each fragment into one text unit
//! - Apply the error policy (short message vs. full trace)

use std::error::Error;
use std::panic::Location;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How error fragments are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPolicy {
    /// Render only the error's message instead of its trace.
    pub use_message: bool,
}

/// One unit of a logged message.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Struct(Value),
    Failure { message: String, trace: String },
}

impl Fragment {
    /// Capture an error as a fragment. The trace starts with
    /// `Error: <message>` followed by the call site and the source chain.
    #[track_caller]
    pub fn failure(err: &(dyn Error + 'static)) -> Self {
        let message = err.to_string();
        let caller = Location::caller();
        let mut trace = format!("Error: {message}\n    at {caller}");
        let mut source = err.source();
        while let Some(cause) = source {
            trace.push_str(&format!("\n    caused by: {cause}"));
            source = cause.source();
        }
        Fragment::Failure { message, trace }
    }

    /// Serialise any value as a structured fragment.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Fragment::from(v),
            Err(e) => Fragment::Text(format!("<unserializable: {e}>")),
        }
    }

    pub fn render(&self, policy: ErrorPolicy) -> String {
        match self {
            Fragment::Text(text) => text.clone(),
            Fragment::Struct(value) => value.to_string(),
            Fragment::Failure { message, trace } => {
                if policy.use_message {
                    message.clone()
                } else {
                    trace.clone()
                }
            }
        }
    }
}

impl From<Value> for Fragment {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Fragment::Text(s),
            Value::Null => Fragment::Text("null".into()),
            Value::Bool(b) => Fragment::Text(b.to_string()),
            Value::Number(n) => Fragment::Text(n.to_string()),
            other => Fragment::Struct(other),
        }
    }
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Fragment::Text(s.to_string())
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Fragment::Text(s)
    }
}

impl From<&String> for Fragment {
    fn from(s: &String) -> Self {
        Fragment::Text(s.clone())
    }
}

macro_rules! text_fragments {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Fragment {
                fn from(v: $t) -> Self {
                    Fragment::Text(v.to_string())
                }
            }

            impl From<$t> for Message {
                fn from(v: $t) -> Self {
                    Message(vec![Fragment::from(v)])
                }
            }
        )*
    };
}

text_fragments!(i32, i64, u32, u64, usize, f64, bool, char);

/// Ordered fragments of one log call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message(pub Vec<Fragment>);

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, fragment: impl Into<Fragment>) -> Self {
        self.0.push(fragment.into());
        self
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.0
    }

    /// Normalise every fragment to text, in order.
    pub fn render(&self, policy: ErrorPolicy) -> Vec<String> {
        self.0.iter().map(|f| f.render(policy)).collect()
    }
}

impl From<Fragment> for Message {
    fn from(f: Fragment) -> Self {
        Message(vec![f])
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message(vec![Fragment::from(s)])
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message(vec![Fragment::from(s)])
    }
}

impl From<&String> for Message {
    fn from(s: &String) -> Self {
        Message(vec![Fragment::from(s)])
    }
}

/// A JSON array is split into one fragment per element; anything else is a
/// single fragment.
impl From<Value> for Message {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Message(items.into_iter().map(Fragment::from).collect()),
            other => Message(vec![Fragment::from(other)]),
        }
    }
}

impl<T: Into<Fragment>> From<Vec<T>> for Message {
    fn from(items: Vec<T>) -> Self {
        Message(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Fragment>, const N: usize> From<[T; N]> for Message {
    fn from(items: [T; N]) -> Self {
        Message(items.into_iter().map(Into::into).collect())
    }
}

/// Build a [`Message`] from mixed fragments.
///
/// ```
/// use relay_logger::message;
/// let msg = message!["hello", 42, true];
/// assert_eq!(msg.fragments().len(), 3);
/// ```
#[macro_export]
macro_rules! message {
    ($($frag:expr),* $(,)?) => {
        $crate::Message(vec![$($crate::Fragment::from($frag)),*])
    };
}
