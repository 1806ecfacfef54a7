use reckoner::{Engine, Mode};
use std::io::{BufRead, BufReader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut engine = Engine::new();
    let stdin = std::io::stdin();

    for line in BufReader::new(stdin.lock()).lines() {
        let line = line?;
        let line = line.trim();

        match line {
            "" => continue,
            ":alg" => engine.set_mode(Mode::Algebraic),
            ":lin" => engine.set_mode(Mode::LinearSystem),
            _ => match engine.evaluate(line) {
                Ok(value) => println!("{}", value),
                Err(e) => eprintln!("Unable to evaluate \"{}\": {}", line, e),
            },
        }
    }

    Ok(())
}
