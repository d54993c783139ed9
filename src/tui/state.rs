use food_dashboard::form::FoodForm;
use food_dashboard::menu::{apply_event, MenuState};
use food_dashboard::model::{FoodItem, MenuEvent};

pub const TAB_MENU: usize = 0;
pub const TAB_HELP: usize = 1;

#[derive(Default)]
pub struct UiState {
    pub tab: usize,
    pub menu: MenuState,
    pub selected: usize,
    pub create_form: FoodForm,
    pub edit_form: FoodForm,
    /// Validation message shown inside the open modal.
    pub form_error: Option<String>,
    /// Commands sent to the controller that have not completed yet.
    pub in_flight: usize,
}

impl UiState {
    pub fn selected_food(&self) -> Option<&FoodItem> {
        self.menu.foods.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.menu.foods.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Apply one completion from the controller.
    pub fn apply(&mut self, ev: MenuEvent) {
        apply_event(&mut self.menu, ev);
        self.in_flight = self.in_flight.saturating_sub(1);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.menu.foods.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
