// Create the Error, ErrorKind, ResultExt, and Result types.
// Only broken API contracts end up here: a solver giving up or a best-effort pass falling
// short is reported through the returned data instead.
use error_chain::error_chain;

error_chain! {

    errors {
        GenerationModeFixed {
            description("maze generation mode already chosen")
            display("maze generation already started; a generator runs either instantly or stepwise, once")
        }

        SlowGenerateNotStarted {
            description("stepped generation not started")
            display("call start_slow_generate before next_slow_generate")
        }

        GenerationComplete {
            description("maze generation already completed")
            display("maze generation is already completed")
        }

        EmptyQueue {
            description("priority queue is empty")
            display("the queue is empty")
        }

        PathExhausted(count: usize) {
            description("path advanced past its end")
            display("path cursor advanced past all {} points", count)
        }

        InvalidCoordinate(x: u32, y: u32) {
            description("coordinate outside the maze grid")
            display("coordinate ({}, {}) lies outside the maze grid", x, y)
        }
    }
}
