use argh::FromArgs;
use myshell::Interpreter;
use myshell::config::ShellConfig;
use myshell::redirect::RedirectScan;

#[derive(FromArgs)]
/// A small interactive shell with output redirection.
struct Args {
    #[argh(option, short = 'c')]
    /// run a single command line and exit with its status.
    command: Option<String>,

    #[argh(option, default = "String::from(\"$ \")")]
    /// prompt printed before each line.
    prompt: String,

    #[argh(switch)]
    /// only treat redirection operators outside quotes as operators.
    quote_aware_redirects: bool,

    #[argh(switch)]
    /// reject lines that end inside a quote.
    strict_quotes: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = ShellConfig {
        prompt: args.prompt,
        redirect_scan: if args.quote_aware_redirects {
            RedirectScan::QuoteAware
        } else {
            RedirectScan::Raw
        },
        strict_quotes: args.strict_quotes,
    };
    log::debug!("starting with {config:?}");

    let mut sh = Interpreter::new(config);
    let status = match args.command {
        Some(line) => sh.run_line(&line)?,
        None => sh.repl()?,
    };
    std::process::exit(status)
}
