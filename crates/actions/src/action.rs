use std::fmt;

use hotkey::Hotkey;

/// A press/release/removal callback.
pub type Callback = Box<dyn FnMut()>;
/// A dynamic display name provider.
pub type NameProvider = Box<dyn Fn() -> String>;
/// A dynamic enabled/active predicate.
pub type Predicate = Box<dyn Fn() -> bool>;

/// Registration parameters for one action.
///
/// Every callback is optional; a missing one is a no-op (or the default answer for
/// predicates: enabled, not active, name derived from the path).
pub struct ActionParams {
    /// Full action path, e.g. `"Mupen64 > Emulation > Pause"`.
    pub path: String,
    pub(crate) on_press: Option<Callback>,
    pub(crate) on_release: Option<Callback>,
    pub(crate) on_removed: Option<Callback>,
    pub(crate) display_name: Option<NameProvider>,
    pub(crate) enabled: Option<Predicate>,
    pub(crate) active: Option<Predicate>,
    pub(crate) release_on_repress: bool,
    pub(crate) default_hotkey: Option<Hotkey>,
}

impl ActionParams {
    /// Parameters for `path` with no callbacks.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            on_press: None,
            on_release: None,
            on_removed: None,
            display_name: None,
            enabled: None,
            active: None,
            release_on_repress: true,
            default_hotkey: None,
        }
    }

    /// Invoked when the action is pressed.
    pub fn on_press(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_press = Some(Box::new(f));
        self
    }

    /// Invoked when the action is released.
    pub fn on_release(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_release = Some(Box::new(f));
        self
    }

    /// Invoked once when the action is removed from the registry.
    pub fn on_removed(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_removed = Some(Box::new(f));
        self
    }

    /// Overrides the display name derived from the last path segment.
    pub fn display_name(mut self, f: impl Fn() -> String + 'static) -> Self {
        self.display_name = Some(Box::new(f));
        self
    }

    /// Enabled predicate. Without one the action is always enabled.
    pub fn enabled(mut self, f: impl Fn() -> bool + 'static) -> Self {
        self.enabled = Some(Box::new(f));
        self
    }

    /// Active (checked) predicate. Providing one makes the action activatable.
    pub fn active(mut self, f: impl Fn() -> bool + 'static) -> Self {
        self.active = Some(Box::new(f));
        self
    }

    /// A second press while held fires only `on_press` instead of release-then-press.
    pub fn hold_on_repress(mut self) -> Self {
        self.release_on_repress = false;
        self
    }

    /// Hotkey bound at registration unless the table already holds an assigned binding.
    pub fn default_hotkey(mut self, hotkey: Hotkey) -> Self {
        self.default_hotkey = Some(hotkey);
        self
    }
}

impl fmt::Debug for ActionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionParams")
            .field("path", &self.path)
            .field("on_press", &self.on_press.is_some())
            .field("on_release", &self.on_release.is_some())
            .field("on_removed", &self.on_removed.is_some())
            .field("display_name", &self.display_name.is_some())
            .field("enabled", &self.enabled.is_some())
            .field("active", &self.active.is_some())
            .field("release_on_repress", &self.release_on_repress)
            .field("default_hotkey", &self.default_hotkey)
            .finish()
    }
}

/// A registered action plus its press state.
pub(crate) struct Action {
    pub(crate) params: ActionParams,
    pub(crate) pressed: bool,
}

impl Action {
    pub(crate) fn new(params: ActionParams) -> Self {
        Self {
            params,
            pressed: false,
        }
    }

    /// Drive the press state machine for one invocation.
    pub(crate) fn invoke(&mut self, up: bool, release_on_repress: bool) {
        if up {
            if self.pressed {
                self.pressed = false;
                if let Some(f) = self.params.on_release.as_mut() {
                    f();
                }
            }
            return;
        }
        if self.pressed && release_on_repress {
            self.pressed = false;
            if let Some(f) = self.params.on_release.as_mut() {
                f();
            }
        }
        if let Some(f) = self.params.on_press.as_mut() {
            f();
        }
        self.pressed = true;
    }

    pub(crate) fn removed(&mut self) {
        if let Some(f) = self.params.on_removed.as_mut() {
            f();
        }
    }
}
