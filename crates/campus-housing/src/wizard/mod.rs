//! Multi-step preference wizard as a pure state machine.
//!
//! Every action produces a new [`WizardState`] plus the side effects the caller should
//! run (background auto-save, navigation to results). Nothing here performs I/O.

use serde::Serialize;

use crate::search::PreferenceForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Location,
    Price,
    Rooms,
    Amenities,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Location,
        WizardStep::Price,
        WizardStep::Rooms,
        WizardStep::Amenities,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Location => 0,
            Self::Price => 1,
            Self::Rooms => 2,
            Self::Amenities => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Location => "Where do you want to live?",
            Self::Price => "What's your budget?",
            Self::Rooms => "How many bedrooms?",
            Self::Amenities => "Must-have amenities",
        }
    }

    pub fn is_first(self) -> bool {
        self == Self::Location
    }

    pub fn is_last(self) -> bool {
        self == Self::Amenities
    }

    fn next(self) -> Self {
        Self::ALL.get(self.index() + 1).copied().unwrap_or(self)
    }

    fn previous(self) -> Self {
        match self.index() {
            0 => self,
            index => Self::ALL[index - 1],
        }
    }
}

/// A selectable choice: the stored value and what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WizardOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn option(value: &'static str, label: &'static str) -> WizardOption {
    WizardOption { value, label }
}

pub const PRICE_OPTIONS: [WizardOption; 4] = [
    option("500-1000", "$500 - $1000"),
    option("1000-1500", "$1000 - $1500"),
    option("1500-2000", "$1500 - $2000"),
    option("2000+", "$2000+"),
];

pub const BEDROOM_OPTIONS: [WizardOption; 4] = [
    option("0", "Studio"),
    option("1", "1 Bedroom"),
    option("2", "2 Bedrooms"),
    option("3+", "3+ Bedrooms"),
];

pub const AMENITY_OPTIONS: [WizardOption; 6] = [
    option("parking", "Parking"),
    option("gym", "Gym"),
    option("laundry", "In-unit Laundry"),
    option("ac", "Air Conditioning"),
    option("furnished", "Furnished"),
    option("pets", "Pet Friendly"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardState {
    pub step: WizardStep,
    pub form: PreferenceForm,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: WizardStep::Location,
            form: PreferenceForm::default(),
        }
    }
}

impl WizardState {
    /// Starts on the first step, optionally pre-filled from a landing-page query.
    pub fn with_location(location: impl Into<String>) -> Self {
        Self {
            form: PreferenceForm {
                location: location.into(),
                ..PreferenceForm::default()
            },
            ..Self::default()
        }
    }

    pub fn is_selected(&self, amenity: &str) -> bool {
        self.form.amenities.iter().any(|selected| selected == amenity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    SetLocation(String),
    SelectPrice(String),
    SelectBedrooms(String),
    ToggleAmenity(String),
    Next,
    Back,
    /// Replaces the whole form and jumps to the final step for review.
    ApplySuggestion(PreferenceForm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEffect {
    /// Persist the form in the background as an auto-save.
    AutoSave(PreferenceForm),
    /// Run the search with the completed form.
    Submit(PreferenceForm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: WizardState,
    pub effects: Vec<WizardEffect>,
}

impl Transition {
    fn quiet(state: WizardState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with_effect(state: WizardState, effect: WizardEffect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }

    fn autosaved(state: WizardState) -> Self {
        let effect = WizardEffect::AutoSave(state.form.clone());
        Self::with_effect(state, effect)
    }

    pub fn submitted_form(&self) -> Option<&PreferenceForm> {
        self.effects.iter().find_map(|effect| match effect {
            WizardEffect::Submit(form) => Some(form),
            WizardEffect::AutoSave(_) => None,
        })
    }
}

pub fn reduce(state: &WizardState, action: WizardAction) -> Transition {
    let mut next = state.clone();
    match action {
        WizardAction::SetLocation(location) => {
            next.form.location = location;
            Transition::autosaved(next)
        }
        WizardAction::SelectPrice(price) => {
            next.form.price = price;
            Transition::autosaved(next)
        }
        WizardAction::SelectBedrooms(bedrooms) => {
            next.form.bedrooms = bedrooms;
            Transition::autosaved(next)
        }
        WizardAction::ToggleAmenity(amenity) => {
            if next.is_selected(&amenity) {
                next.form.amenities.retain(|selected| selected != &amenity);
            } else {
                next.form.amenities.push(amenity);
            }
            Transition::autosaved(next)
        }
        WizardAction::Next if state.step.is_last() => {
            let form = next.form.clone();
            Transition::with_effect(next, WizardEffect::Submit(form))
        }
        WizardAction::Next => {
            next.step = state.step.next();
            Transition::quiet(next)
        }
        WizardAction::Back => {
            next.step = state.step.previous();
            Transition::quiet(next)
        }
        WizardAction::ApplySuggestion(form) => {
            next.form = form;
            next.step = WizardStep::Amenities;
            Transition::autosaved(next)
        }
    }
}
