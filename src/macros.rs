#[macro_export]
macro_rules! node {
    ( $key: expr ) => {
        $crate::bucket::Node::new($key, ())
    };
    ( $key: expr, $value: expr ) => {
        $crate::bucket::Node::new($key, $value)
    };
}
