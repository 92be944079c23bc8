//! Day-by-day plan that follows the builder's duration.
use crate::catalog::itinerary_catalog;
use crate::dom;
use meridian_builder::itinerary::PLANNED_DURATIONS;
use meridian_builder::{ItineraryCatalog, ItineraryDay, followed_duration};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    #[prop_or(PLANNED_DURATIONS[0])]
    pub initial_days: u32,
}

impl Default for Props {
    fn default() -> Self {
        Self {
            initial_days: PLANNED_DURATIONS[0],
        }
    }
}

fn plan_view(plan: &[ItineraryDay]) -> Html {
    html! {
        <ol class="itBody" data-itinerary-body="">
            { for plan.iter().map(|day| html! {
                <li class="itDay">
                    <h4 class="itDay__title">{ day.title.clone() }</h4>
                    <ul class="itDay__items">
                        { for day.items.iter().map(|item| html! { <li>{ item.clone() }</li> }) }
                    </ul>
                </li>
            }) }
        </ol>
    }
}

#[function_component(Itinerary)]
pub fn itinerary(p: &Props) -> Html {
    let catalog = use_memo((), |()| itinerary_catalog());
    let days = use_state(|| p.initial_days);

    {
        let days = days.clone();
        use_effect_with((), move |()| {
            let listener = dom::listen(dom::BUILDER_CHANGE_EVENT, move |event| {
                if let Some(next) = dom::builder_change_detail(&event)
                    .as_ref()
                    .and_then(followed_duration)
                {
                    days.set(next);
                }
            });
            move || drop(listener)
        });
    }

    let tabs = PLANNED_DURATIONS.iter().map(|&n| {
        let selected = *days == n;
        let onclick = {
            let days = days.clone();
            Callback::from(move |_| {
                days.set(n);
                if let Err(err) = dom::dispatch_days_change(n) {
                    log::debug!("days change not broadcast: {err}");
                }
            })
        };
        html! {
            <button
                type="button"
                role="tab"
                class={classes!("itTab", selected.then_some("is-active"))}
                aria-selected={selected.to_string()}
                data-days={n.to_string()}
                {onclick}
            >
                { format!("{n} days") }
            </button>
        }
    });

    let plan: &ItineraryCatalog = &catalog;
    html! {
        <section class="itinerary" data-itinerary="">
            <div class="itTabs" role="tablist">{ for tabs }</div>
            { plan_view(plan.plan_for(*days)) }
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[test]
    fn starts_on_three_day_plan() {
        let html = block_on(LocalServerRenderer::<Itinerary>::new().render());
        assert!(html.contains("Day 3 · Match day + departure"));
        assert!(!html.contains("Day 4"));
        assert_eq!(html.matches("role=\"tab\"").count(), 3);
        assert!(html.contains("data-days=\"3\""));
    }

    #[test]
    fn unplanned_duration_shows_fallback() {
        let html = block_on(
            LocalServerRenderer::<Itinerary>::with_props(Props { initial_days: 9 }).render(),
        );
        assert!(html.contains("Day 5 · Match day + wrap-up"));
        assert!(!html.contains("is-active"));
    }
}
