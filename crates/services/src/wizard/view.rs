use admissions_core::model::{FormSchema, ReviewSummary, WizardState};

/// Where a step sits relative to the one being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepIndicator {
    pub number: u8,
    pub title: String,
    pub status: StepStatus,
}

/// Presentation-agnostic render state for the wizard.
///
/// Built purely from `WizardState`; projecting the same state twice yields
/// equal views.
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub current_step: u8,
    pub total_steps: u8,
    pub title: String,
    pub progress_percent: f64,
    pub progress_label: u8,
    pub indicators: Vec<StepIndicator>,
    pub show_prev: bool,
    pub show_next: bool,
    pub show_submit: bool,
    /// Present on the last step only.
    pub review: Option<ReviewSummary>,
    pub submitted: bool,
}

impl StepView {
    #[must_use]
    pub fn project(schema: &FormSchema, state: &WizardState) -> Self {
        let current = state.current_step();
        let last = state.is_last_step();
        Self {
            current_step: current,
            total_steps: state.total_steps(),
            title: schema.title(current).to_string(),
            progress_percent: state.progress_percent(),
            progress_label: state.progress_label(),
            indicators: indicators(schema, |number| match number.cmp(&current) {
                std::cmp::Ordering::Less => StepStatus::Completed,
                std::cmp::Ordering::Equal => StepStatus::Active,
                std::cmp::Ordering::Greater => StepStatus::Upcoming,
            }),
            show_prev: !state.is_first_step(),
            show_next: !last,
            show_submit: last,
            review: last.then(|| ReviewSummary::build(schema, state)),
            submitted: false,
        }
    }

    /// Terminal display after the application was accepted.
    #[must_use]
    pub fn submitted(schema: &FormSchema, state: &WizardState) -> Self {
        Self {
            current_step: state.total_steps(),
            total_steps: state.total_steps(),
            title: schema.title(state.total_steps()).to_string(),
            progress_percent: 100.0,
            progress_label: 100,
            indicators: indicators(schema, |_| StepStatus::Completed),
            show_prev: false,
            show_next: false,
            show_submit: false,
            review: None,
            submitted: true,
        }
    }
}

fn indicators(schema: &FormSchema, status: impl Fn(u8) -> StepStatus) -> Vec<StepIndicator> {
    schema
        .steps()
        .iter()
        .map(|step| StepIndicator {
            number: step.number,
            title: step.title.clone(),
            status: status(step.number),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_hides_prev_and_submit() {
        let schema = FormSchema::admissions();
        let state = WizardState::for_schema(&schema);
        let view = StepView::project(&schema, &state);
        assert_eq!(view.title, "Personal Information");
        assert!(!view.show_prev);
        assert!(view.show_next);
        assert!(!view.show_submit);
        assert!(view.review.is_none());
        assert_eq!(view.indicators[0].status, StepStatus::Active);
        assert!(
            view.indicators[1..]
                .iter()
                .all(|i| i.status == StepStatus::Upcoming)
        );
    }

    #[test]
    fn last_step_shows_submit_and_review() {
        let schema = FormSchema::admissions();
        let mut state = WizardState::for_schema(&schema);
        state.set_current_step(5).unwrap();
        let view = StepView::project(&schema, &state);
        assert!(view.show_prev);
        assert!(!view.show_next);
        assert!(view.show_submit);
        assert_eq!(view.progress_label, 100);
        assert!(view.review.is_some());
        assert_eq!(
            view.indicators
                .iter()
                .filter(|i| i.status == StepStatus::Completed)
                .count(),
            4
        );
        assert_eq!(view, StepView::project(&schema, &state));
    }

    #[test]
    fn submitted_view_completes_everything() {
        let schema = FormSchema::admissions();
        let state = WizardState::for_schema(&schema);
        let view = StepView::submitted(&schema, &state);
        assert!(view.submitted);
        assert_eq!(view.progress_label, 100);
        assert!(!view.show_prev && !view.show_next && !view.show_submit);
        assert!(
            view.indicators
                .iter()
                .all(|i| i.status == StepStatus::Completed)
        );
    }
}
