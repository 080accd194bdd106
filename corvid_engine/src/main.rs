extern crate corvid;
extern crate corvid_engine;

use corvid_engine::engine::Engine;

/// Command-line front-end. Runs a line-based protocol loop identical in shape to
/// a UCI engine: `position`/`setboard` load a game, `go` searches it, `stop`
/// halts a search in progress, and `quit` exits.
fn main() {
    let mut engine = Engine::init(true);
    engine.uci();
}
