use crate::interactive::{file_lines, Format, PlanConfirmer};
use crate::GeneratorChoice;
use anyhow::Context;
use api_scaffold_codegen::{
    ArtisanGenerator, CodeGenerator, LocalFileStore, PatchOutcome, ScaffoldReport, Scaffolder, StubGenerator,
};
use api_scaffold_core::ProjectLayout;
use std::path::PathBuf;

pub struct MakeApiArgs {
    pub name: String,
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub assume_yes: bool,
    pub generator: GeneratorChoice,
    pub php: String,
    pub json: bool,
}

pub fn api(args: MakeApiArgs) -> anyhow::Result<()> {
    let resolved = ProjectLayout::resolve(&args.root, args.config.as_deref())
        .context("failed to resolve project layout")?;
    for (field, source) in &resolved.sources {
        tracing::debug!(field = *field, %source, "layout value");
    }
    let layout = resolved.layout;
    let store = LocalFileStore::new(&args.root);

    let artisan;
    let stub;
    let generator: &dyn CodeGenerator = match args.generator {
        GeneratorChoice::Artisan => {
            artisan = ArtisanGenerator::new(&args.root, layout.clone())
                .context("--generator artisan cannot be used with this layout")?
                .with_php(&args.php);
            &artisan
        }
        GeneratorChoice::Stub => {
            stub = StubGenerator::new(&store, &layout);
            &stub
        }
    };

    let confirmer = PlanConfirmer {
        assume_yes: args.assume_yes,
        quiet: args.json,
    };
    let report = Scaffolder::new(&layout, &store, generator)
        .run(&args.name, &confirmer)
        .with_context(|| format!("make:api {} failed", args.name))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, &layout);
    Ok(())
}

fn print_report(report: &ScaffoldReport, layout: &ProjectLayout) {
    match report {
        ScaffoldReport::Cancelled => Format::warning("Operation cancelled."),
        ScaffoldReport::Completed {
            resource,
            created,
            migration,
        } => {
            println!();
            if *migration == PatchOutcome::NotFound {
                Format::info(&format!(
                    "No migration containing create_{}_table was found in {}; nothing was patched.",
                    resource.table(),
                    layout.migrations_dir.display()
                ));
            }
            Format::success(&format!(
                "All template API resources for {} created successfully!",
                resource
            ));
            Format::info("Files created or modified:");
            Format::list(&file_lines(created));
        }
    }
}
