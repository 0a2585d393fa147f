//! Tests for environment variable expansion in paths

use fenwick_diagram::domain::expand_env_vars;

#[test]
fn given_path_with_dollar_var_when_expanding_then_substitutes() {
    // Arrange
    std::env::set_var("FENWICK_TEST_OUT", "/srv/diagrams");

    // Act
    let result = expand_env_vars("$FENWICK_TEST_OUT/fenwick");

    // Assert
    assert_eq!(result, "/srv/diagrams/fenwick");

    // Cleanup
    std::env::remove_var("FENWICK_TEST_OUT");
}

#[test]
fn given_path_with_braced_var_when_expanding_then_substitutes() {
    // Arrange
    std::env::set_var("FENWICK_TEST_BIN", "/opt/graphviz/bin");

    // Act
    let result = expand_env_vars("${FENWICK_TEST_BIN}/dot");

    // Assert
    assert_eq!(result, "/opt/graphviz/bin/dot");

    // Cleanup
    std::env::remove_var("FENWICK_TEST_BIN");
}

#[test]
fn given_undefined_var_when_expanding_then_returns_input() {
    let input = "$FENWICK_TEST_UNDEFINED_VAR_XYZ/out";

    assert_eq!(expand_env_vars(input), input);
}

#[test]
fn given_plain_path_when_expanding_then_unchanged() {
    assert_eq!(expand_env_vars("./out"), "./out");
}
