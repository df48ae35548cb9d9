use log::debug;

/// Selection and scroll window over the visible rows.
pub struct NavigationState {
    list_size: u16,
    selected_index: usize,
    visible_window: (u16, u16),
    window_buffer: u16,
}

impl NavigationState {
    /// `list_height` is the number of terminal rows available for notes.
    pub fn new(list_height: u16) -> Self {
        let list_height = list_height.max(1);
        NavigationState {
            selected_index: 0,
            visible_window: (0, list_height - 1), // window is 0-based
            list_size: 0,
            window_buffer: 2,
        }
    }

    pub fn get_visible_window(&self) -> (u16, u16) {
        self.visible_window
    }

    pub fn get_selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn increment_selected_index(&mut self, increment: usize) {
        let new_index = self.selected_index.saturating_add(increment);

        if (new_index as u16) < self.list_size {
            if self.visible_window.1 < ((new_index as u16) + self.buffer()) {
                let mut window_start = self.visible_window.0;
                let visibility_range = self.visible_window.1 - self.visible_window.0;
                loop {
                    let window_end = window_start + visibility_range;
                    if window_end >= (new_index as u16) + self.buffer()
                        || window_end + 1 >= self.list_size
                    {
                        break;
                    }
                    window_start = window_start.saturating_add(1);
                }
                self.visible_window = (window_start, window_start + visibility_range);
            }

            debug!(
                "selection down - new_index:{},old index:{},vw:{},{}",
                new_index, self.selected_index, self.visible_window.0, self.visible_window.1
            );

            self.selected_index = new_index;
        }
    }

    pub fn decrement_selected_index(&mut self, decrement: usize) {
        let new_index = self.selected_index.saturating_sub(decrement);

        if self.visible_window.0 + self.buffer() > (new_index as u16) {
            let mut window_start = self.visible_window.0;
            let visibility_range = self.visible_window.1 - self.visible_window.0;
            loop {
                if window_start + self.buffer() <= (new_index as u16) || window_start == 0 {
                    break;
                }
                window_start = window_start.saturating_sub(1);
            }
            self.visible_window = (window_start, window_start + visibility_range);
        }

        debug!(
            "selection up - new_index:{},old index:{},vw:{},{}",
            new_index, self.selected_index, self.visible_window.0, self.visible_window.1
        );

        self.selected_index = new_index;
    }

    /// Record how many rows are visible now, pulling the selection back
    /// inside the list when it shrank.
    pub fn set_list_size(&mut self, list_size: u16) {
        self.list_size = list_size;
        let last = list_size.saturating_sub(1) as usize;
        if self.selected_index > last {
            self.decrement_selected_index(self.selected_index - last);
        }
    }

    /// Back to the top, used when the query changes.
    pub fn reset(&mut self) {
        let visibility_range = self.visible_window.1 - self.visible_window.0;
        self.selected_index = 0;
        self.visible_window = (0, visibility_range);
    }

    // Never more than half the window, so the selection stays on screen.
    fn buffer(&self) -> u16 {
        let visibility_range = self.visible_window.1 - self.visible_window.0;
        self.window_buffer.min(visibility_range / 2)
    }

    pub fn is_row_visible(&self, index: usize) -> bool {
        let index = index as u16;
        index >= self.visible_window.0 && index <= self.visible_window.1
    }
}
