use minish::Shell;

fn main() -> anyhow::Result<()> {
    let mut shell = Shell::new();
    shell.repl()
}
