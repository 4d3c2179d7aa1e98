/// Declare a test that parses a listing, runs it with the given initial
/// slots, and checks the outcome (a value, or the kind of error).
macro_rules! test_case {
    (
        name: $name:ident,
        listing: $listing:expr,
        slots: [$($slot:expr),* $(,)?],
        result: $result:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let program = stackloop::Program::from_listing($listing).unwrap();
            let result = stackloop::VM::with_slots(&program, &[$($slot),*]).run();
            let expected: Result<i64, stackloop::ErrorKind> = $result;
            pretty_assertions::assert_eq!(result.map_err(|e| e.kind()), expected);
        }
    };
    (
        $name:ident,
        $($rest:tt)*
    ) => {
        test_case!(name: $name, $($rest)*);
    };
}
