/*!
# FairGo DevKit - Stubs et Utilitaires pour Tests

Bibliothèque facilitant les tests du kernel et du dashboard avec:
- Serveur HTTP factice (upstream citybik.es ou endpoint /api/live)
- Fixtures JSON au format upstream et au format snapshot
- Mocks du recognizer vocal et de la surface de navigation
- Helpers d'attente pour les tâches asynchrones
*/

pub mod stub_server;
pub mod fixtures;
pub mod mocks;
pub mod test_utils;

pub use stub_server::StubServer;
pub use fixtures::FixtureBuilder;
pub use mocks::{MockRecognizer, MockSurface};
pub use test_utils::wait_until;
