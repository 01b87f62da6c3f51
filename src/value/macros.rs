/// Constructs a [`Value`](crate::Value) using a JSON-like literal syntax.
///
/// ```rust
/// use graphql::graphql_value;
///
/// let hero = graphql_value!({
///     "name": "R2-D2",
///     "appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"],
///     "primaryFunction": null,
/// });
/// ```
#[macro_export]
macro_rules! graphql_value {
    (null) => ($crate::Value::Null);

    ([ $($arr:tt)* ]) => {
        $crate::Value::List($crate::graphql_value!(@array [] $($arr)*))
    };

    ({ $($map:tt)* }) => {{
        #[allow(unused_mut)]
        let mut object = $crate::Object::new();
        $crate::graphql_value!(@object object () ($($map)*));
        $crate::Value::Object(object)
    }};

    ($e:expr) => ($crate::Value::from($e));

    // Array element munching. Composite elements match their trailing comma
    // explicitly so the accumulator always keeps its `expr,` shape.
    (@array [ $($elems:expr,)* ]) => (vec![$($elems,)*]);
    (@array [ $($elems:expr,)* ] null , $($rest:tt)*) => {
        $crate::graphql_value!(@array [ $($elems,)* $crate::graphql_value!(null), ] $($rest)*)
    };
    (@array [ $($elems:expr,)* ] null) => {
        $crate::graphql_value!(@array [ $($elems,)* $crate::graphql_value!(null), ])
    };
    (@array [ $($elems:expr,)* ] [ $($arr:tt)* ] , $($rest:tt)*) => {
        $crate::graphql_value!(@array [ $($elems,)* $crate::graphql_value!([ $($arr)* ]), ] $($rest)*)
    };
    (@array [ $($elems:expr,)* ] [ $($arr:tt)* ]) => {
        $crate::graphql_value!(@array [ $($elems,)* $crate::graphql_value!([ $($arr)* ]), ])
    };
    (@array [ $($elems:expr,)* ] { $($map:tt)* } , $($rest:tt)*) => {
        $crate::graphql_value!(@array [ $($elems,)* $crate::graphql_value!({ $($map)* }), ] $($rest)*)
    };
    (@array [ $($elems:expr,)* ] { $($map:tt)* }) => {
        $crate::graphql_value!(@array [ $($elems,)* $crate::graphql_value!({ $($map)* }), ])
    };
    (@array [ $($elems:expr,)* ] $next:expr , $($rest:tt)*) => {
        $crate::graphql_value!(@array [ $($elems,)* $crate::graphql_value!($next), ] $($rest)*)
    };
    (@array [ $($elems:expr,)* ] $last:expr) => {
        $crate::graphql_value!(@array [ $($elems,)* $crate::graphql_value!($last), ])
    };

    // Object entry munching: accumulate a key, then its value.
    (@object $object:ident () ()) => {};
    (@object $object:ident ($key:expr) (: null $($rest:tt)*)) => {
        $object.add_field($key, $crate::graphql_value!(null));
        $crate::graphql_value!(@object $object () ($($rest)*));
    };
    (@object $object:ident ($key:expr) (: [ $($arr:tt)* ] $($rest:tt)*)) => {
        $object.add_field($key, $crate::graphql_value!([ $($arr)* ]));
        $crate::graphql_value!(@object $object () ($($rest)*));
    };
    (@object $object:ident ($key:expr) (: { $($map:tt)* } $($rest:tt)*)) => {
        $object.add_field($key, $crate::graphql_value!({ $($map)* }));
        $crate::graphql_value!(@object $object () ($($rest)*));
    };
    (@object $object:ident ($key:expr) (: $value:expr , $($rest:tt)*)) => {
        $object.add_field($key, $crate::graphql_value!($value));
        $crate::graphql_value!(@object $object () ($($rest)*));
    };
    (@object $object:ident ($key:expr) (: $value:expr)) => {
        $object.add_field($key, $crate::graphql_value!($value));
    };
    (@object $object:ident () (, $($rest:tt)*)) => {
        $crate::graphql_value!(@object $object () ($($rest)*));
    };
    (@object $object:ident () ($key:tt $($rest:tt)*)) => {
        $crate::graphql_value!(@object $object ($key) ($($rest)*));
    };
}

/// Constructs [`Variables`](crate::Variables) from a JSON-like literal.
///
/// ```rust
/// use graphql::graphql_vars;
///
/// let vars = graphql_vars! {"episode": "JEDI", "withFriends": true};
/// ```
#[macro_export]
macro_rules! graphql_vars {
    () => ($crate::Variables::new());
    ({ $($map:tt)* }) => ($crate::graphql_vars!($($map)*));
    ($($map:tt)*) => {{
        match $crate::graphql_value!({ $($map)* }) {
            $crate::Value::Object(obj) => obj
                .into_iter()
                .collect::<$crate::Variables>(),
            _ => unreachable!("`graphql_vars!` input is always an object"),
        }
    }};
}
