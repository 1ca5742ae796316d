use serde_json::Value;

/// Shared capability of every composable builder: expose the JSON
/// document ("body") it has accumulated so far.
///
/// `body()` is a live view: mutations made through the builder's own
/// methods are visible on subsequent calls. `into_body()` consumes the
/// builder and releases the document to the caller, which is how a
/// finished builder is embedded as a value inside another one.
///
/// Every implementor also provides `From<Builder> for Value`, so any
/// API position typed `impl Into<Value>` accepts raw scalars, arrays,
/// strings, and built documents interchangeably.
pub trait Embodied {
    /// The current internal document.
    fn body(&self) -> &Value;

    /// Consume the builder and return its document.
    fn into_body(self) -> Value;
}
