/// Tells the dispatcher whether a mode handled the invocation.
pub enum CliModeResult {
    Finish,
    NothingToDo,
}
