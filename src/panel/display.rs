/// Output surface the panel core reports to.
pub trait PanelDisplay {
    /// Render the frequency and governor strings of one CPU.
    fn show_text(&mut self, cpu: usize, frequency: &str, governor: &str);

    /// Set one CPU's slider fill, in cells of the shared full scale.
    fn set_slider(&mut self, cpu: usize, position: u16);

    /// Request a redraw of the whole panel.
    fn redraw(&mut self);
}
