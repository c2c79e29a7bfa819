use ragroute_domain::{Category, RouteDecision};

use crate::RagService;

impl RagService {
	/// First routing. Classifier failures become [`RouteDecision::Fallback`].
	pub async fn route_question(&self, question: &str) -> RouteDecision {
		match self.providers.router.route(&self.cfg.providers.llm, question).await {
			Ok(raw) => log_anomaly(RouteDecision::parse(&raw), "route"),
			Err(err) => {
				tracing::warn!(error = %err, "Routing failed; using fallback.");

				RouteDecision::Fallback
			},
		}
	}

	/// Re-routing with the categories already tried. The classifier is told to avoid
	/// `visited`, but nothing here enforces it; the controller does.
	pub async fn reroute_question(&self, question: &str, visited: &[Category]) -> RouteDecision {
		match self.providers.router.reroute(&self.cfg.providers.llm, question, visited).await {
			Ok(raw) => log_anomaly(RouteDecision::parse(&raw), "reroute"),
			Err(err) => {
				tracing::warn!(error = %err, ?visited, "Re-routing failed; using fallback.");

				RouteDecision::Fallback
			},
		}
	}
}

fn log_anomaly(decision: RouteDecision, stage: &'static str) -> RouteDecision {
	if let RouteDecision::Unparseable(raw) = &decision {
		tracing::warn!(stage, raw = %raw, "Router returned an out-of-catalog label.");
	}

	decision
}
