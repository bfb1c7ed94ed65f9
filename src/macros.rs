//! The [`zoon!`] macro for building [`Value`](crate::Value) trees inline.

/// Construct a [`Value`](crate::Value) from a JSON-like literal.
///
/// ```
/// use serde_zoon::zoon;
///
/// let order = zoon!({
///     "id": 7,
///     "status": "shipped",
///     "tags": ["rush", "gift"],
///     "coupon": null,
/// });
/// assert!(order.is_object());
/// ```
#[macro_export]
macro_rules! zoon {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(::std::vec![ $( $crate::zoon!($elem) ),* ])
    };

    ({}) => {
        $crate::Value::Object($crate::ZoonMap::new())
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        let mut map = $crate::ZoonMap::new();
        $(
            map.insert(($key).to_string(), $crate::zoon!($value));
        )*
        $crate::Value::Object(map)
    }};

    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or($crate::Value::Null)
    };
}
