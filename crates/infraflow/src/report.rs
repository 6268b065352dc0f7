use colored::Colorize;
use infraflow_cloud::{Action, Environment, Provider};
use infraflow_config::{InfraflowConfig, ProjectLayout};
use infraflow_core::{RunOutcome, RunState};

pub fn print_header(
    config: &InfraflowConfig,
    layout: &ProjectLayout,
    environment: &Environment,
    provider: Provider,
    action: Action,
) {
    println!("{}", format!("infraflow {}", action).blue().bold());
    println!("  project:     {}", config.project.cyan());
    println!("  root:        {}", layout.root().display().to_string().cyan());
    println!("  environment: {}", environment.as_str().cyan());
    println!("  provider:    {} ({})", provider.as_str().cyan(), provider.display_name());
    println!();
}

pub fn print_outcome(outcome: &RunOutcome, layout: &ProjectLayout) {
    let run = &outcome.run;
    println!();

    for warning in &run.warnings {
        println!("  {} {}", "⚠".yellow(), warning);
    }

    if let Some(err) = &outcome.error {
        eprintln!("{}", format!("✗ {}", err.category()).red().bold());
        for line in err.to_string().lines() {
            eprintln!("  {}", line);
        }
        return;
    }

    match run.state {
        RunState::Planned => {
            if let Some(plan) = &run.plan_artifact {
                let summary = if plan.has_changes {
                    "changes pending"
                } else {
                    "no changes"
                };
                println!("{} ({})", "✓ Plan written".green().bold(), summary);
                println!("  {}", plan.path.display().to_string().cyan());
            }
        }
        RunState::Applied => {
            println!("{}", "✓ Infrastructure applied".green().bold());
            if let Some(outputs) = &run.outputs {
                for (name, value) in outputs.known() {
                    println!("  {:<24} {}", name, value);
                }
            }
            if let Some(context) = &run.kube_context {
                println!("  {:<24} {}", "kube context", context.cyan());
            }
            let applied = run.manifest_groups.iter().filter(|g| g.applied).count();
            if applied > 0 {
                println!("  {} manifest groups applied", applied);
            }
            if !run.urls.is_empty() {
                println!();
                println!("{}", "Endpoints:".bold());
                for url in &run.urls {
                    println!("  • {:<12} {}", url.name, url.url.cyan());
                }
            }
        }
        RunState::Destroyed => println!("{}", "✓ Infrastructure destroyed".green().bold()),
        RunState::Cancelled => println!("{}", "Destroy cancelled, nothing was changed".yellow()),
        _ => {}
    }

    println!();
    println!(
        "Run snapshot: {}",
        layout
            .snapshot_path(run.provider, &run.environment)
            .display()
            .to_string()
            .dimmed()
    );
}
