use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    /// Spinner frame for the refresh indicator.
    AnimationTick,
}
