use clap::{Parser, Subcommand};
use kisoku::ast::DisplayExpression;
use kisoku::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Validate, compile and run commission rule expressions and rule graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional engine configuration JSON (evaluation budget, layout)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Print the parse tree of every compiled expression
    #[arg(long, global = true)]
    ast: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the lexical validator on an expression
    Validate { expression: String },
    /// Compile and evaluate an expression
    Eval {
        expression: String,
        /// Path to an execution context JSON file
        #[arg(long)]
        context: Option<String>,
    },
    /// List the built-in templates
    Templates {
        /// Validate and compile every template expression
        #[arg(long)]
        check: bool,
        /// Print the library as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Import a rule graph export, then assemble and run each root rule group
    Graph {
        export_path: String,
        /// Path to an execution context JSON file
        #[arg(long)]
        context: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| EngineConfig::from_json(&json).map_err(|e| e.to_string()))
            .unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to load config '{}': {}", path, e))
            }),
        None => EngineConfig::default(),
    };

    let compiler = Compiler::builder()
        .with_max_depth(config.budget.max_depth)
        .build();
    let evaluator = Evaluator::new()
        .with_compiler(compiler.clone())
        .with_budget(config.budget);

    match cli.command {
        Command::Validate { expression } => run_validate(&expression),
        Command::Eval {
            expression,
            context,
        } => run_eval(&compiler, &evaluator, &expression, context, cli.ast),
        Command::Templates { check, json } => run_templates(&compiler, check, json, cli.ast),
        Command::Graph {
            export_path,
            context,
        } => run_graph(&compiler, &evaluator, config.layout, &export_path, context, cli.ast),
    }
}

fn run_validate(expression: &str) {
    let result = validate(expression);
    println!("Valid: {}", result.is_valid);
    for error in &result.errors {
        println!("  error:   {}", error);
    }
    for warning in &result.warnings {
        println!("  warning: {}", warning);
    }
    if !result.is_valid {
        std::process::exit(1);
    }
}

fn run_eval(
    compiler: &Compiler,
    evaluator: &Evaluator,
    expression: &str,
    context_path: Option<String>,
    show_ast: bool,
) {
    let context = load_context(context_path);
    let compiled = compiler
        .compile(expression)
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
    for warning in &compiled.warnings {
        println!("warning: {}", warning);
    }
    if show_ast {
        println!("{}", DisplayExpression { expr: &compiled.ast });
    }

    let result = evaluator.run(&compiled, &context);
    match (&result.result, &result.error) {
        (Some(value), _) => println!("-> {}", value),
        (_, Some(error)) => println!("-> Error: {}", error),
        _ => {}
    }
    println!("Execution time: {:.3} ms", result.execution_time);
    if !result.success {
        std::process::exit(1);
    }
}

fn run_templates(compiler: &Compiler, check: bool, json: bool, show_ast: bool) {
    let library = TemplateLibrary::standard();
    if json {
        let output = library
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to export templates: {}", e)));
        println!("{}", output);
        return;
    }

    let mut failures = 0;
    for template in library.templates() {
        println!(
            "{:<24} {:<12} {:<13} {}",
            template.id,
            template.category.to_string(),
            format!("{:?}", template.complexity).to_lowercase(),
            template.name
        );
        if !check {
            continue;
        }
        for (field, expression) in template.expressions() {
            match compiler.compile(expression) {
                Ok(compiled) if show_ast => {
                    println!("  {}:", field);
                    println!("{}", DisplayExpression { expr: &compiled.ast });
                }
                Ok(_) => {}
                Err(e) => {
                    failures += 1;
                    println!("  {} FAILED: {}", field, e);
                }
            }
        }
    }

    if check {
        println!("\n{} templates checked, {} failing fields", library.len(), failures);
        if failures > 0 {
            std::process::exit(1);
        }
    }
}

fn run_graph(
    compiler: &Compiler,
    evaluator: &Evaluator,
    layout: LayoutConfig,
    export_path: &str,
    context_path: Option<String>,
    show_ast: bool,
) {
    let total_start = Instant::now();
    let json = fs::read_to_string(export_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read export '{}': {}", export_path, e))
    });
    let graph = RuleGraph::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to import graph: {}", e)))
        .with_layout(layout);
    let context = load_context(context_path);

    println!("Imported {} nodes", graph.len());
    let orphans = graph.orphans();
    if !orphans.is_empty() {
        println!("{} orphaned node(s):", orphans.len());
        for node in orphans {
            println!("  {} ({})", node.id, node.node_type);
        }
    }

    let groups: Vec<String> = graph
        .root_groups(NodeType::RuleGroup)
        .map(|node| node.id.clone())
        .collect();
    for group_id in groups {
        println!("\nRule group {}", group_id);
        let definition = match graph.assemble(&group_id) {
            Ok(definition) => definition,
            Err(e) => {
                println!("  Assembly failed: {}", e);
                continue;
            }
        };
        println!("  Name:      {}", definition.name);
        println!("  Condition: {}", definition.condition);

        let rule = match compiler.compile_rule(&definition) {
            Ok(rule) => rule,
            Err(e) => {
                println!("  Compilation failed: {}", e);
                continue;
            }
        };
        if show_ast {
            println!("{}", DisplayExpression { expr: &rule.condition.ast });
        }

        let outcome = evaluator.run_rule(&rule, &context);
        println!("  Matched:   {}", outcome.matched);
        if let Some(error) = &outcome.condition.error {
            println!("  Condition error: {}", error);
        }
        for action in &outcome.actions {
            let shown = match (&action.result.result, &action.result.error) {
                (Some(value), _) => value.to_string(),
                (_, Some(error)) => format!("Error: {}", error),
                _ => String::new(),
            };
            println!("  Action {} ({:?}): {}", action.name, action.branch, shown);
        }
    }

    println!("\nTotal: {:?}", total_start.elapsed());
}

fn load_context(path: Option<String>) -> ExecutionContext {
    match path {
        Some(path) => ExecutionContext::from_file(&path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load context from '{}': {}", path, e))
        }),
        None => ExecutionContext::new(),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
