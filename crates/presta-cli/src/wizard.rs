//! The interactive wizard: production wiring, the route loop, and one
//! screen per step.
//!
//! Screens own no business rules. They collect input, hand it to the
//! application services, and translate outcomes into the next route, the
//! same way the steps themselves translate backend results into notices.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::DefaultEditor;

use presta_application::documents::LANDING_REDIRECT_DELAY;
use presta_application::{
    ApprovalStep, DocumentsStep, FixedDelayUnderwriter, LoanSession, ResumeOutcome, SimulationStep,
    StepEntry,
};
use presta_core::bank::{self, BankSelection};
use presta_core::decision::Underwriter;
use presta_core::document::{SelfieCamera, REQUIRED_UPLOADS};
use presta_core::loan::{AccountType, ApplicationStatus, LoanApplication};
use presta_core::notice::Notifier;
use presta_core::quote;
use presta_core::simulation::SimulationForm;
use presta_infrastructure::files::load_document_file;
use presta_infrastructure::{
    CommandCamera, ConfigStorage, FileSessionStore, SupabaseApplicationRepository, SupabaseClient,
    SupabaseDocumentStore,
};

use crate::notifier::TerminalNotifier;
use crate::prompts;

/// The wizard's screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Simulate,
    Approval,
    Documents,
    NotFound,
}

impl Route {
    /// Parses a route name from the command line. Unknown names land on
    /// the not-found screen, the way a bad URL would.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "" | "landing" => Self::Landing,
            "simulate" | "simulation" => Self::Simulate,
            "approval" => Self::Approval,
            "documents" => Self::Documents,
            _ => Self::NotFound,
        }
    }
}

/// Where a stored application picks up, by status.
fn continue_route(record: &LoanApplication) -> Route {
    match record.status {
        Some(ApplicationStatus::Approved) => Route::Documents,
        Some(ApplicationStatus::DocumentsSubmitted) => Route::Landing,
        Some(ApplicationStatus::Simulated) | None => Route::Approval,
    }
}

/// Detour forced by the resume outcome before the landing menu shows:
/// a cleared session was already noticed and restarts on the simulation
/// form. Anything else stays on the landing screen.
fn resume_redirect(outcome: &ResumeOutcome) -> Option<Route> {
    match outcome {
        ResumeOutcome::SessionCleared => Some(Route::Simulate),
        ResumeOutcome::NoSession | ResumeOutcome::Resumed(_) => None,
    }
}

fn money(value: f64) -> String {
    format!("R$ {value:.2}")
}

/// Builds the production collaborators and runs the wizard.
pub async fn run(start: Route) -> Result<()> {
    let storage = ConfigStorage::new()?;
    let config = storage
        .load()
        .with_context(|| format!("could not load configuration ({})", storage.path().display()))?;

    let client = SupabaseClient::new(config.backend.url.clone(), config.backend.anon_key.clone());
    let repository = Arc::new(SupabaseApplicationRepository::new(
        client.clone(),
        config.backend.table.clone(),
    ));
    let documents = Arc::new(SupabaseDocumentStore::new(
        client,
        config.backend.bucket.clone(),
    ));
    let session_store = Arc::new(FileSessionStore::new()?);
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
    let session = Arc::new(LoanSession::new(
        repository,
        documents,
        session_store,
        notifier.clone(),
    ));

    let mut wizard = Wizard::new(
        session,
        Arc::new(FixedDelayUnderwriter::new()),
        Arc::new(CommandCamera::new(config.camera.command.clone())),
        notifier,
    )?;
    wizard.run(start).await
}

/// Drives the screens until the applicant quits.
pub struct Wizard {
    session: Arc<LoanSession>,
    underwriter: Arc<dyn Underwriter>,
    camera: Arc<dyn SelfieCamera>,
    notifier: Arc<dyn Notifier>,
    editor: DefaultEditor,
}

impl Wizard {
    pub fn new(
        session: Arc<LoanSession>,
        underwriter: Arc<dyn Underwriter>,
        camera: Arc<dyn SelfieCamera>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        Ok(Self {
            session,
            underwriter,
            camera,
            notifier,
            editor: DefaultEditor::new()?,
        })
    }

    pub async fn run(&mut self, start: Route) -> Result<()> {
        let mut route = start;
        loop {
            tracing::debug!(target: "presta::wizard", ?route, "entering route");
            route = match route {
                Route::Landing => match self.landing().await? {
                    Some(next) => next,
                    None => break,
                },
                Route::Simulate => self.simulate().await?,
                Route::Approval => self.approval().await?,
                Route::Documents => self.documents().await?,
                Route::NotFound => self.not_found(),
            };
        }
        println!("{}", "Goodbye!".bright_green());
        Ok(())
    }

    /// Entry screen: greets a resumed session or offers a fresh start.
    /// `None` means the applicant chose to quit.
    async fn landing(&mut self) -> Result<Option<Route>> {
        println!();
        println!("{}", "=== Presta ===".bright_magenta().bold());
        println!("Personal loans without the queue.");
        println!();

        let outcome = self.session.resume().await;
        if let Some(route) = resume_redirect(&outcome) {
            return Ok(Some(route));
        }

        if let ResumeOutcome::Resumed(record) = outcome {
            if continue_route(&record) == Route::Landing {
                // Terminal status; nothing left to continue
                println!("Your documents are under review. We will be in touch soon.");
                self.session.set_application_id(None).await?;
            } else {
                match record.first_name() {
                    Some(name) => println!("Welcome back, {name}!"),
                    None => println!("Welcome back!"),
                }
                let items = ["Continue my application", "Start a new application", "Quit"];
                return match prompts::choose(&mut self.editor, "What would you like to do?", &items)?
                {
                    Some(0) => Ok(Some(continue_route(&record))),
                    Some(1) => {
                        self.session.set_application_id(None).await?;
                        Ok(Some(Route::Simulate))
                    }
                    _ => Ok(None),
                };
            }
        }

        let items = ["Simulate a loan", "Quit"];
        match prompts::choose(&mut self.editor, "What would you like to do?", &items)? {
            Some(0) => Ok(Some(Route::Simulate)),
            _ => Ok(None),
        }
    }

    /// Simulation form: the quote first, then the applicant's details.
    async fn simulate(&mut self) -> Result<Route> {
        println!();
        println!("{}", "--- Loan simulation ---".bold());

        let Some(amount) = prompts::amount(&mut self.editor)? else {
            return Ok(Route::Landing);
        };
        let total = quote::total_with_interest(amount);
        let quotes = quote::plan_quotes(total);
        println!("Total with interest: {}", money(total).bold());

        let items: Vec<String> = quotes
            .iter()
            .map(|q| format!("{} of {}", q.plan, money(q.monthly_payment)))
            .collect();
        let Some(choice) = prompts::choose(&mut self.editor, "Installments", &items)? else {
            return Ok(Route::Landing);
        };

        let Some(name) = prompts::required_line(&mut self.editor, "Full name")? else {
            return Ok(Route::Landing);
        };
        let Some(email) = prompts::required_line(&mut self.editor, "Email")? else {
            return Ok(Route::Landing);
        };
        let Some(phone) = prompts::required_line(&mut self.editor, "Phone")? else {
            return Ok(Route::Landing);
        };
        let Some(cpf) = prompts::required_line(&mut self.editor, "CPF")? else {
            return Ok(Route::Landing);
        };
        let Some(address) = prompts::optional_line(&mut self.editor, "Address")? else {
            return Ok(Route::Landing);
        };
        let Some(profession) = prompts::optional_line(&mut self.editor, "Profession")? else {
            return Ok(Route::Landing);
        };
        let Some(salary) = prompts::optional_line(&mut self.editor, "Monthly income")? else {
            return Ok(Route::Landing);
        };

        let form = SimulationForm {
            amount,
            plan: Some(quotes[choice].plan),
            name,
            email,
            phone,
            cpf,
            address,
            profession,
            salary,
        };

        let step = SimulationStep::new(self.session.clone(), self.notifier.clone());
        loop {
            match step.submit(&form).await {
                Ok(_) => return Ok(Route::Approval),
                // The step already noticed the failure
                Err(_) => match prompts::confirm(&mut self.editor, "Try sending again?")? {
                    Some(true) => continue,
                    _ => return Ok(Route::Landing),
                },
            }
        }
    }

    /// Approval screen: analysis, decision, plan choice, confirmation.
    async fn approval(&mut self) -> Result<Route> {
        println!();
        println!("{}", "--- Credit analysis ---".bold());

        let mut step = ApprovalStep::new(
            self.session.clone(),
            self.underwriter.clone(),
            self.notifier.clone(),
        );
        let record = match step.enter().await {
            StepEntry::Ready(record) => record,
            StepEntry::RedirectToSimulation => return Ok(Route::Simulate),
        };

        match record.first_name() {
            Some(name) => println!("Hang tight while we verify your information, {name}."),
            None => println!("Hang tight while we verify your information."),
        }

        step.begin_analysis()?;
        // The analysis runs in the background; these pace the wait
        for status in [
            "Verifying personal data...",
            "Reviewing credit score...",
            "Computing the best conditions...",
        ] {
            println!("{}", status.bright_black());
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
        let decision = step.decision().await?;

        println!();
        println!(
            "{}",
            "Congratulations! Your loan was pre-approved."
                .bright_green()
                .bold()
        );
        println!("Approved amount: {}", money(decision.approved_amount).bold());
        println!(
            "Total with interest: {}",
            money(decision.total_with_interest)
        );

        loop {
            let mut items: Vec<String> = decision
                .plans
                .iter()
                .map(|q| format!("{} of {}", q.plan, money(q.monthly_payment)))
                .collect();
            items.push("Decline the offer".to_string());

            let choice =
                match prompts::choose(&mut self.editor, "Choose your installments", &items)? {
                    Some(choice) if choice < decision.plans.len() => choice,
                    // Declining clears the session; the record stays simulated
                    _ => {
                        step.abandon().await?;
                        return Ok(Route::Simulate);
                    }
                };

            let schedule = step.select_plan(decision.plans[choice].plan)?;
            println!();
            println!("{}", "Payment schedule".bold());
            for due in &schedule {
                println!(
                    "  {:>2}. {}  {}",
                    due.number,
                    due.display_date(),
                    money(due.amount)
                );
            }

            match prompts::confirm(&mut self.editor, "Accept these conditions?")? {
                Some(true) => {
                    if step.confirm().await.is_ok() {
                        return Ok(Route::Documents);
                    }
                    // The step already noticed the failure; offer the menu again
                }
                Some(false) => {}
                None => {
                    step.abandon().await?;
                    return Ok(Route::Simulate);
                }
            }
        }
    }

    /// Documents screen: six uploads, bank details, and the closing patch.
    async fn documents(&mut self) -> Result<Route> {
        println!();
        println!("{}", "--- Documents and disbursement ---".bold());

        let mut step = DocumentsStep::new(
            self.session.clone(),
            self.camera.clone(),
            self.notifier.clone(),
        );
        let record = match step.enter().await {
            StepEntry::Ready(record) => record,
            StepEntry::RedirectToSimulation => return Ok(Route::Simulate),
        };
        print_summary(&record);

        for kind in REQUIRED_UPLOADS.iter().copied() {
            let label = format!("{} ({})", kind.label(), kind.accepted_types_hint());
            loop {
                let Some(path) = prompts::existing_path(&mut self.editor, &label)? else {
                    return Ok(Route::Landing);
                };
                match load_document_file(&path).await {
                    Ok(file) => {
                        step.form.attach(kind, file);
                        break;
                    }
                    Err(e) => println!("{}", format!("Could not read the file: {e}").yellow()),
                }
            }
        }

        loop {
            match prompts::confirm(&mut self.editor, "Capture your selfie now?")? {
                Some(true) => {
                    if step.capture_selfie().await {
                        break;
                    }
                    // Capture failed and was noticed; ask again
                }
                Some(false) => println!("{}", "The selfie is required to finish.".yellow()),
                None => return Ok(Route::Landing),
            }
        }

        let mut items: Vec<String> = bank::CATALOG.iter().map(|bank| bank.label()).collect();
        items.push("Other".to_string());
        let Some(choice) = prompts::choose(&mut self.editor, "Bank for the deposit", &items)?
        else {
            return Ok(Route::Landing);
        };
        step.form.bank = Some(if choice < bank::CATALOG.len() {
            BankSelection::Listed(&bank::CATALOG[choice])
        } else {
            let Some(code) = prompts::required_line(&mut self.editor, "Bank code")? else {
                return Ok(Route::Landing);
            };
            let Some(name) = prompts::required_line(&mut self.editor, "Bank name")? else {
                return Ok(Route::Landing);
            };
            BankSelection::Other { code, name }
        });

        let Some(agency) = prompts::required_line(&mut self.editor, "Agency")? else {
            return Ok(Route::Landing);
        };
        step.form.agency = agency;
        let Some(account) = prompts::required_line(&mut self.editor, "Account")? else {
            return Ok(Route::Landing);
        };
        step.form.account = account;

        let account_types = [AccountType::Checking, AccountType::Savings];
        let labels: Vec<&str> = account_types.iter().map(|t| t.label()).collect();
        let Some(choice) = prompts::choose(&mut self.editor, "Account type", &labels)? else {
            return Ok(Route::Landing);
        };
        step.form.account_type = Some(account_types[choice]);

        loop {
            match step.submit().await {
                Ok(_) => {
                    println!("{}", "Taking you back to the start...".bright_black());
                    tokio::time::sleep(LANDING_REDIRECT_DELAY).await;
                    return Ok(Route::Landing);
                }
                // The step already noticed the failure; uploads that went
                // through are not repeated unless the applicant retries
                Err(_) => match prompts::confirm(&mut self.editor, "Try sending again?")? {
                    Some(true) => continue,
                    _ => return Ok(Route::Landing),
                },
            }
        }
    }

    fn not_found(&self) -> Route {
        println!();
        println!("{}", "Oops! Nothing at that route.".yellow());
        Route::Landing
    }
}

/// Read-only recap of the applicant and the approved conditions.
fn print_summary(record: &LoanApplication) {
    println!("{}", "Your application".bold());
    if let Some(name) = &record.name {
        println!("  Name:   {name}");
    }
    if let Some(email) = &record.email {
        println!("  Email:  {email}");
    }
    if let Some(phone) = &record.phone {
        println!("  Phone:  {phone}");
    }
    if let Some(cpf) = &record.cpf {
        println!("  CPF:    {cpf}");
    }
    if let Some(amount) = record.approved_amount {
        println!("  Approved amount: {}", money(amount).bold());
    }
    if let (Some(plan), Some(payment)) = (record.installments_option, record.monthly_payment) {
        println!("  Installments:    {} of {}", plan, money(payment));
    }
    println!();
}
