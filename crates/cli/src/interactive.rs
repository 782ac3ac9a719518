use api_scaffold_codegen::{Confirmer, PlannedFile, ScaffoldPlan};
use api_scaffold_core::ScaffoldError;
use console::style;
use inquire::{Confirm, InquireError};

/// Output formatting utilities
pub struct Format;

impl Format {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", style("✅").green(), style(message).green().bold());
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        println!("{} {}", style("⚠️").yellow(), style(message).yellow());
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{}", style(message).cyan());
    }

    /// Print a bulleted list
    pub fn list<S: AsRef<str>>(items: &[S]) {
        for item in items {
            println!(" - {}", item.as_ref());
        }
    }
}

/// One display line per file, e.g. `app/Models/Invoice.php (model)`.
pub fn file_lines(files: &[PlannedFile]) -> Vec<String> {
    files
        .iter()
        .map(|file| format!("{} ({})", file.path.display(), file.kind))
        .collect()
}

/// Shows the plan, then asks on the terminal unless `assume_yes` is set.
pub struct PlanConfirmer {
    pub assume_yes: bool,
    /// Suppress the plan listing, for machine-readable output.
    pub quiet: bool,
}

impl Confirmer for PlanConfirmer {
    fn confirm(&self, plan: &ScaffoldPlan) -> Result<bool, ScaffoldError> {
        if !self.quiet {
            Format::info("The following files will be created or modified:");
            Format::list(&file_lines(&plan.files));
        }

        if self.assume_yes {
            return Ok(true);
        }

        match Confirm::new("Do you want to proceed?").with_default(false).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(ScaffoldError::Prompt(format!("{} (pass --yes to skip the prompt)", e))),
        }
    }
}
