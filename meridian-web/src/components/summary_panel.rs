use meridian_builder::Summary;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub summary: Summary,
}

#[function_component(SummaryPanel)]
pub fn summary_panel(p: &Props) -> Html {
    let s = &p.summary;
    let row = |label: &'static str, value: String| {
        html! {
            <div class="ebSummary__row">
                <span class="muted">{ label }</span>
                <strong>{ value }</strong>
            </div>
        }
    };
    html! {
        <div class="ebSummary" data-eb-summary="" aria-live="polite">
            { row("City", s.city.clone()) }
            { row("Days", s.days_label.clone()) }
            { row("Dates", s.dates_label.clone()) }
            { row("Level", s.level.clone()) }
            { row("Group", s.group.to_string()) }
            <div class="ebSummary__addons">
                { for s.addons.iter().map(|chip| html! {
                    <span class={classes!("chip", chip.selected.then_some("chip--gold"))}>
                        { chip.label.clone() }
                    </span>
                }) }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use meridian_builder::{ExperienceConfig, IsoDate, summarize};
    use yew::LocalServerRenderer;

    #[test]
    fn renders_rows_and_none_chip() {
        let config = ExperienceConfig {
            date_start: IsoDate::parse("2025-06-01"),
            ..ExperienceConfig::default()
        };
        let props = Props {
            summary: summarize(&config, false),
        };
        let html = block_on(LocalServerRenderer::<SummaryPanel>::with_props(props).render());
        assert!(html.contains("01 Jun 2025 → (flexible)"));
        assert!(html.contains("<span class=\"chip\">None</span>"));
        assert!(!html.contains("chip--gold"));
    }

    #[test]
    fn selected_addons_render_as_gold_chips() {
        let config = ExperienceConfig {
            addons: ["Spa", "Physio"].into_iter().collect(),
            ..ExperienceConfig::default()
        };
        let props = Props {
            summary: summarize(&config, false),
        };
        let html = block_on(LocalServerRenderer::<SummaryPanel>::with_props(props).render());
        assert_eq!(html.matches("chip--gold").count(), 2);
        assert!(!html.contains(">None<"));
    }
}
