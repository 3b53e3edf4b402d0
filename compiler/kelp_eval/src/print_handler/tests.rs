use super::*;

#[test]
fn buffer_captures_print_and_println() {
    let handler = buffer_handler();
    handler.print("a");
    handler.print(" b");
    handler.println("!");
    assert_eq!(handler.get_output(), "a b!\n");
}

#[test]
fn buffer_clear_empties_it() {
    let handler = buffer_handler();
    handler.println("x");
    handler.clear();
    assert!(handler.get_output().is_empty());
}

#[test]
fn silent_and_stdout_capture_nothing() {
    let silent = silent_handler();
    silent.println("ignored");
    assert!(silent.get_output().is_empty());
    assert!(stdout_handler().get_output().is_empty());
}
