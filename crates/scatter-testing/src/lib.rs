/*!
# Scatter Test Fixtures

Scriptable in-memory [`SimEndpoint`] implementing the engine's `Endpoint`
trait: a linear cost model for estimates, optional estimate unavailability
above a size threshold, scripted per-attempt submission outcomes, and a full
call log so tests can assert how many remote calls a run actually made and
exactly which chunks were confirmed.
*/

mod sim;

pub use sim::{ConfirmedChunk, SimEndpoint};
