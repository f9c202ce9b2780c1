use hotkey::Hotkey;

/// The "choose a hotkey" dialog.
pub trait HotkeyPrompt {
    /// Ask for a new hotkey for the action captioned `caption`, starting from `current`.
    /// `None` means the dialog was cancelled.
    fn prompt(&mut self, caption: &str, current: Hotkey) -> Option<Hotkey>;
}
