use campus_housing::config::AppConfig;
use campus_housing::error::AppError;
use campus_housing::listings::ScoredProperty;
use campus_housing::preferences::{
    suggested_preferences, AutoSaveFilter, AutoSaver, ExportFormat, ExportRequest,
    ExportedPreferences, FilePreferenceStore, InMemoryPreferenceStore, PreferenceFilter,
    PreferenceStore, DEFAULT_EXPORT_LIMIT,
};
use campus_housing::presentation::{map_view_for, RenderSurface};
use campus_housing::search::{MockListingSource, PreferenceForm, SearchService};
use campus_housing::wizard::{reduce, WizardAction, WizardEffect, WizardState};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// University or neighborhood to search near
    #[arg(long, default_value = "Boston University")]
    pub(crate) location: String,
    /// Price range such as 1000-1500 or 2000+
    #[arg(long, default_value = "1000-1500")]
    pub(crate) price: String,
    /// Bedroom count: 0 for studio, 1, 2, or 3+
    #[arg(long, default_value = "1")]
    pub(crate) bedrooms: String,
    /// Amenity to require; repeat for several
    #[arg(long = "amenity")]
    pub(crate) amenities: Vec<String>,
    /// Map rendering surface (rich or fallback); defaults to configuration
    #[arg(long)]
    pub(crate) surface: Option<String>,
    /// Use the bundled sample listings even when a search endpoint is configured
    #[arg(long)]
    pub(crate) bundled: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Include auto-saved records alongside explicit saves
    #[arg(long)]
    pub(crate) include_auto_save: bool,
    /// Export only auto-saved records
    #[arg(long)]
    pub(crate) only_auto_save: bool,
    /// Maximum number of records
    #[arg(long, default_value_t = DEFAULT_EXPORT_LIMIT)]
    pub(crate) limit: usize,
    /// Output shape: records or ai
    #[arg(long, default_value = "records")]
    pub(crate) format: String,
    /// Preference directory; defaults to configuration
    #[arg(long)]
    pub(crate) dir: Option<PathBuf>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = Arc::new(InMemoryPreferenceStore::default());
    let autosave = AutoSaver::new(store.clone());

    println!("Campus housing search demo");
    let form = walk_wizard(&args, &autosave).await?;
    println!("- Results page: /search-results?{}", form.to_query_string());

    let service = if args.bundled {
        SearchService::new(Arc::new(MockListingSource::bundled()?))
    } else {
        SearchService::from_config(&config.search)?
    };
    let service = service.with_autosave(autosave.clone());

    let outcome = service.search(&form).await;
    println!(
        "\n{} properties near {} ({})",
        outcome.listings.len(),
        if form.location.is_empty() {
            "anywhere"
        } else {
            form.location.as_str()
        },
        outcome.price_label
    );
    if outcome.degraded {
        println!("  Listing search failed; showing no results");
    }
    if outcome.listings.is_empty() {
        println!("  No Results Found");
    }

    if !outcome.listings.top_matches.is_empty() {
        println!("Top matches:");
        for listing in &outcome.listings.top_matches {
            print_listing(listing);
        }
    }
    if !outcome.listings.others.is_empty() {
        println!("More listings:");
        for listing in &outcome.listings.others {
            print_listing(listing);
        }
    }

    let focused = outcome.listings.iter().next();
    if let Some(listing) = focused {
        if let Err(err) = autosave.track_listing_view(&outcome.query, listing).await {
            println!("  Listing view tracking did not finish: {}", err);
        }
    }

    let surface = args
        .surface
        .as_deref()
        .map(RenderSurface::from_str)
        .unwrap_or(config.presentation.map_surface);
    let view = map_view_for(surface).render(
        &outcome.listings,
        focused.map(|listing| &listing.property.id),
    );
    println!("\nMap view ({:?}):", surface);
    println!("{}", serde_json::to_string_pretty(&view)?);

    println!("\nSuggested searches:");
    for suggestion in suggested_preferences(store.as_ref())? {
        println!(
            "- [{:?}] {}: {}",
            suggestion.kind, suggestion.label, suggestion.summary
        );
    }

    let only_auto_save = PreferenceFilter {
        auto_save: AutoSaveFilter::OnlyAutoSave,
        limit: None,
    };
    println!(
        "\n{} auto-saved preference records captured in memory",
        store.list(&only_auto_save)?.len()
    );

    Ok(())
}

/// Drives the wizard with the CLI answers, capturing each auto-save along the way.
async fn walk_wizard(args: &DemoArgs, autosave: &AutoSaver) -> Result<PreferenceForm, AppError> {
    let mut actions = vec![
        WizardAction::SetLocation(args.location.clone()),
        WizardAction::Next,
        WizardAction::SelectPrice(args.price.clone()),
        WizardAction::Next,
        WizardAction::SelectBedrooms(args.bedrooms.clone()),
        WizardAction::Next,
    ];
    actions.extend(args.amenities.iter().cloned().map(WizardAction::ToggleAmenity));
    actions.push(WizardAction::Next);

    let mut state = WizardState::default();
    let mut pending = Vec::new();
    let mut submitted = None;
    for action in actions {
        let transition = reduce(&state, action);
        for effect in transition.effects {
            match effect {
                WizardEffect::AutoSave(form) => {
                    pending.push(autosave.capture(serde_json::to_value(&form)?));
                }
                WizardEffect::Submit(form) => submitted = Some(form),
            }
        }
        state = transition.state;
        println!("- Step: {}", state.step.title());
    }

    for handle in pending {
        if let Err(err) = handle.await {
            println!("  Auto-save did not finish: {}", err);
        }
    }

    Ok(submitted.unwrap_or(state.form))
}

fn print_listing(listing: &ScoredProperty) {
    let property = &listing.property;
    println!(
        "  - {:>3}% {} | {} | {} | {} bd / {} ba",
        listing.match_score,
        property.title,
        property.price,
        property.location.address.display_line(),
        property.description.beds,
        property.description.baths
    );
}

pub(crate) fn run_preferences_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        include_auto_save,
        only_auto_save,
        limit,
        format,
        dir,
    } = args;

    let config = AppConfig::load()?;
    let store = FilePreferenceStore::new(dir.unwrap_or(config.storage.preferences_dir));
    let request = ExportRequest::new(include_auto_save, only_auto_save, limit)
        .with_format(ExportFormat::from_str(&format));

    let records = store.list(&request.filter)?;
    let payload = ExportedPreferences::shape(records, request.format).into_payload();
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
