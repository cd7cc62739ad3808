use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub label: &'static str,
    pub description: &'static str,
}

impl KeyBinding {
    pub const fn new(key: KeyCode, modifiers: KeyModifiers, label: &'static str, description: &'static str) -> Self {
        Self {
            key,
            modifiers,
            label,
            description,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.code && self.modifiers == event.modifiers
    }
}

/// What a key press asks the browser to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHelp,
    NextTab,
    PrevTab,
    SelectTab(usize),
    PrevPage,
    NextPage,
    Submit,
    Retry,
    Restart,
    Backspace,
    ClearSearch,
    Type(char),
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub next_tab: KeyBinding,
    pub prev_tab: KeyBinding,
    pub prev_page: KeyBinding,
    pub next_page: KeyBinding,
    pub submit: KeyBinding,
    pub retry: KeyBinding,
    pub restart: KeyBinding,
    pub clear_search: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, "Ctrl+C", "Quit"),
            help: KeyBinding::new(KeyCode::Char('g'), KeyModifiers::CONTROL, "Ctrl+G", "Show/hide help"),
            next_tab: KeyBinding::new(KeyCode::Tab, KeyModifiers::NONE, "Tab", "Next tag"),
            prev_tab: KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT, "Shift+Tab", "Previous tag"),
            prev_page: KeyBinding::new(KeyCode::Left, KeyModifiers::NONE, "←", "Previous page"),
            next_page: KeyBinding::new(KeyCode::Right, KeyModifiers::NONE, "→", "Next page"),
            submit: KeyBinding::new(KeyCode::Enter, KeyModifiers::NONE, "Enter", "Search now"),
            retry: KeyBinding::new(KeyCode::Char('r'), KeyModifiers::CONTROL, "Ctrl+R", "Retry failed request"),
            restart: KeyBinding::new(KeyCode::Char('t'), KeyModifiers::CONTROL, "Ctrl+T", "Restart"),
            clear_search: KeyBinding::new(KeyCode::Char('u'), KeyModifiers::CONTROL, "Ctrl+U", "Clear search"),
        }
    }
}

impl KeyMap {
    /// Map a key press to an action. Unbound printable keys type into the search box.
    pub fn action_for(&self, event: &KeyEvent) -> Option<Action> {
        let bound = [
            (&self.quit, Action::Quit),
            (&self.help, Action::ToggleHelp),
            (&self.next_tab, Action::NextTab),
            (&self.prev_tab, Action::PrevTab),
            (&self.prev_page, Action::PrevPage),
            (&self.next_page, Action::NextPage),
            (&self.submit, Action::Submit),
            (&self.retry, Action::Retry),
            (&self.restart, Action::Restart),
            (&self.clear_search, Action::ClearSearch),
        ];
        if let Some((_, action)) = bound.into_iter().find(|(binding, _)| binding.matches(event)) {
            return Some(action);
        }

        match (event.code, event.modifiers) {
            (KeyCode::Esc, _) => Some(Action::Quit),
            (KeyCode::Backspace, _) => Some(Action::Backspace),
            (KeyCode::Char(c @ '1'..='9'), KeyModifiers::ALT) => {
                Some(Action::SelectTab(c as usize - '1' as usize))
            }
            (KeyCode::Char(c), m) if m.difference(KeyModifiers::SHIFT).is_empty() => Some(Action::Type(c)),
            _ => None,
        }
    }

    /// Help lines for all key bindings
    pub fn help_lines(&self) -> Vec<(&'static str, &'static str)> {
        let mut lines: Vec<_> = [
            &self.next_tab,
            &self.prev_tab,
            &self.prev_page,
            &self.next_page,
            &self.submit,
            &self.clear_search,
            &self.retry,
            &self.restart,
            &self.help,
            &self.quit,
        ]
        .iter()
        .map(|b| (b.label, b.description))
        .collect();
        lines.insert(2, ("Alt+1..9", "Jump to tag"));
        lines
    }
}
