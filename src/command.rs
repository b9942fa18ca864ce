#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
  Activate,
  ClearQuery,
  DeleteChar,
  FocusInput,
  FocusResults,
  HideHelp,
  InsertChar(char),
  None,
  PageDown,
  PageUp,
  Quit,
  SelectFirst,
  SelectLast,
  SelectNext,
  SelectPrevious,
  ShowHelp,
}
