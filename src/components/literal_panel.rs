//! Side panel listing the selected entity's literal properties.

use leptos::prelude::*;

use crate::explorer::Selection;

/// One displayable row of the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct LiteralRow {
	pub name: String,
	pub value: String,
	pub datatype: Option<String>,
}

/// Rows for `selection`, in the order the backend returned them.
pub fn literal_rows(selection: &Selection) -> Vec<LiteralRow> {
	selection
		.literals
		.iter()
		.map(|literal| LiteralRow {
			name: literal.display_predicate().to_string(),
			value: literal.value.clone(),
			datatype: literal
				.datatype
				.as_deref()
				.map(|dt| crate::explorer::uri_fragment(dt).to_string()),
		})
		.collect()
}

/// Shows the literals of the current selection. Hidden while the selection
/// has no literals.
#[component]
pub fn LiteralPanel(#[prop(into)] selection: Signal<Option<Selection>>) -> impl IntoView {
	let rows = move || selection.get().map(|s| (s.label.clone(), literal_rows(&s)));

	move || {
		rows().filter(|(_, rows)| !rows.is_empty()).map(|(label, rows)| {
			view! {
				<aside class="literals-panel">
					<h4>{label}</h4>
					<ul class="literals-content">
						{rows
							.into_iter()
							.map(|row| {
								view! {
									<li>
										<div class="literal-name">{row.name}</div>
										<div class="literal-value">{row.value}</div>
										{row.datatype.map(|dt| view! { <div class="literal-datatype">{dt}</div> })}
									</li>
								}
							})
							.collect_view()}
					</ul>
				</aside>
			}
		})
	}
}
