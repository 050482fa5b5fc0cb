use std::path::{Path, PathBuf};

mod terminal;

use clap::ArgAction;
use evac_planner::{
    config::Config,
    coordinator::Coordinator,
    domain::{
        Level, RescueTeam, Resource, ResourceKind, Role, TeamKind, TransportMode, User, Zone,
    },
    storage::Scenario,
};
use terminal::{level_label, Colorize};
use tracing::instrument;

/// Parse an urgency or risk level from a string, case-insensitively.
fn parse_level(s: &str) -> Result<Level, String> {
    s.parse()
}

fn parse_mode(s: &str) -> Result<TransportMode, String> {
    s.parse()
}

fn parse_kind(s: &str) -> Result<ResourceKind, String> {
    s.parse()
}

fn parse_team_kind(s: &str) -> Result<TeamKind, String> {
    s.parse()
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse()
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path of the planner configuration file
    #[arg(short, long, default_value = "planner.toml", global = true)]
    config: PathBuf,

    /// Override the scenario file named in the configuration
    #[arg(short, long, global = true)]
    scenario: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = Config::load_or_default(&self.config);
        let scenario = self.scenario.unwrap_or_else(|| config.scenario.clone());

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(&config, &scenario)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn load(path: &Path) -> anyhow::Result<Coordinator> {
    if path.exists() {
        Ok(Scenario::load(path)?.build()?)
    } else {
        Ok(Coordinator::new())
    }
}

fn save(coordinator: &Coordinator, path: &Path) -> anyhow::Result<()> {
    Scenario::capture(coordinator).save(path)?;
    Ok(())
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show scenario counters and queue totals (default)
    Status(Status),

    /// Initialize an empty scenario and default configuration
    Init,

    /// Register a zone
    AddZone(AddZone),

    /// Connect two zones with a directed route
    Connect(Connect),

    /// Register a resource stocked at a zone
    AddResource(AddResource),

    /// Register a rescue team stationed at a zone
    AddTeam(AddTeam),

    /// Register a user
    AddUser(AddUser),

    /// Plan an evacuation and queue it by priority
    Plan(Plan),

    /// Take the highest-priority evacuation off the queue and start it
    Process,

    /// Complete a processed evacuation and move the people between zones
    Complete(Complete),

    /// Show the shortest path between two zones
    Path(PathCommand),

    /// Show the fastest (or safest) route between two zones
    Route(RouteCommand),

    /// Show the most critical zones and resources
    Critical(Critical),

    /// Show the pending evacuation queue
    Queue,

    /// Reserve stock from a resource and place it at a zone
    AssignResource(AssignResource),

    /// Deploy a team to a zone
    AssignTeam(AssignTeam),

    /// Associate a resource with the route that carries it
    Associate(Associate),

    /// Manage distribution trees
    Tree(Tree),
}

impl Command {
    fn run(self, config: &Config, scenario: &Path) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(scenario)?,
            Self::Init => Init::run(config, scenario)?,
            Self::AddZone(command) => command.run(scenario)?,
            Self::Connect(command) => command.run(scenario)?,
            Self::AddResource(command) => command.run(scenario)?,
            Self::AddTeam(command) => command.run(scenario)?,
            Self::AddUser(command) => command.run(scenario)?,
            Self::Plan(command) => command.run(config, scenario)?,
            Self::Process => process(scenario)?,
            Self::Complete(command) => command.run(scenario)?,
            Self::Path(command) => command.run(scenario)?,
            Self::Route(command) => command.run(scenario)?,
            Self::Critical(command) => command.run(config, scenario)?,
            Self::Queue => queue(scenario)?,
            Self::AssignResource(command) => command.run(scenario)?,
            Self::AssignTeam(command) => command.run(scenario)?,
            Self::Associate(command) => command.run(scenario)?,
            Self::Tree(command) => command.run(scenario)?,
        }
        Ok(())
    }
}

#[derive(Debug, Default, clap::Parser)]
#[command(about = "Show scenario counters and queue totals")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let coordinator = load(scenario)?;
        let stats = coordinator.statistics();

        if stats.zones == 0 {
            println!("No zones registered yet. Create one with 'evac add-zone'.");
            return Ok(());
        }

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
            OutputFormat::Table => {
                if self.quiet {
                    println!(
                        "zones={} critical={} pending={} processed={}",
                        stats.zones,
                        stats.critical_zones,
                        stats.pending_evacuations,
                        stats.processed_evacuations
                    );
                } else {
                    println!("Scenario status");
                    println!("{}", "───────────────".dim());
                    println!("{:<22} {}", "Zones", stats.zones);
                    println!("{:<22} {}", "Routes", stats.routes);
                    println!("{:<22} {}", "Resources", stats.resources);
                    println!("{:<22} {}", "Teams", stats.teams);
                    println!("{:<22} {}", "Users", stats.users);
                    println!("{:<22} {}", "Affected people", stats.total_affected);
                    println!();
                    println!("{:<22} {}", "Pending evacuations", stats.pending_evacuations);
                    println!(
                        "{:<22} {}",
                        "Processed evacuations", stats.processed_evacuations
                    );
                    println!("{:<22} {}", "People evacuated", stats.people_evacuated);
                    println!(
                        "{:<22} {:.1}",
                        "Mean processing (h)", stats.mean_processing_hours
                    );
                    println!();
                    for (kind, available) in &stats.stock_by_kind {
                        println!("{:<22} {}", format!("{kind} stock"), available);
                    }

                    println!();
                    if stats.critical_zones == 0 {
                        println!("Critical zones: {} ✅", "0".success());
                    } else {
                        println!(
                            "Critical zones: {} ⚠️",
                            stats.critical_zones.to_string().warning()
                        );
                        println!("{}", "Run 'evac critical' to investigate.".dim());
                    }
                }
            }
        }

        Ok(())
    }
}

pub struct Init {}

impl Init {
    #[instrument]
    fn run(config: &Config, scenario: &Path) -> anyhow::Result<()> {
        if scenario.exists() {
            anyhow::bail!(
                "Scenario already initialized (found existing {})",
                scenario.display()
            );
        }

        save(&Coordinator::new(), scenario)?;
        config
            .save(Path::new("planner.toml"))
            .map_err(|e| anyhow::anyhow!("Failed to create planner.toml: {e}"))?;

        println!("Initialized scenario in {}", scenario.display());
        println!("  Created: {}", scenario.display());
        println!("  Created: planner.toml");
        println!();
        println!("Next steps:");
        println!("  evac add-zone Z1 \"North district\" --population 8000");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct AddZone {
    /// Zone id
    id: String,

    /// Human-readable name
    name: String,

    /// X coordinate
    #[arg(long, default_value_t = 0.0)]
    x: f64,

    /// Y coordinate
    #[arg(long, default_value_t = 0.0)]
    y: f64,

    /// Affected population; the risk level is derived from it
    #[arg(long, short, default_value_t = 0)]
    population: u32,
}

impl AddZone {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;
        let zone = Zone::new(&self.id, &self.name, self.x, self.y, self.population);
        let risk = zone.risk_level();
        coordinator.add_zone(zone)?;
        save(&coordinator, scenario)?;

        println!("Added zone {} (risk: {})", self.id, level_label(risk));
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Connect {
    /// Route id
    id: String,

    /// Origin zone id
    origin: String,

    /// Destination zone id
    destination: String,

    /// Distance in kilometres
    #[arg(long, short)]
    distance: f64,

    /// Estimated travel time in hours
    #[arg(long, short, default_value_t = 1.0)]
    time: f64,

    /// Transport mode (land, air, sea)
    #[arg(long, short, default_value = "land", value_parser = parse_mode)]
    mode: TransportMode,

    /// Risk level in [0.0, 1.0]
    #[arg(long, short, default_value_t = 0.0)]
    risk: f64,

    /// Maximum simultaneous occupancy
    #[arg(long, default_value_t = 0)]
    capacity: u32,
}

impl Connect {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;
        coordinator.connect_zones(
            &self.id,
            &self.origin,
            &self.destination,
            self.distance,
            self.time,
            self.mode,
        )?;
        coordinator.set_route_risk(&self.id, self.risk)?;
        coordinator.set_route_capacity(&self.id, self.capacity)?;
        save(&coordinator, scenario)?;

        println!(
            "Connected {} → {} via {} ({} km, {} h, {})",
            self.origin, self.destination, self.id, self.distance, self.time, self.mode
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct AddResource {
    /// Resource id
    id: String,

    /// Human-readable name
    name: String,

    /// Resource kind (food, medicine, equipment)
    #[arg(value_parser = parse_kind)]
    kind: ResourceKind,

    /// Initial stock
    quantity: u32,

    /// Unit of measure
    #[arg(long, short, default_value = "units")]
    unit: String,

    /// Zone holding the stock
    #[arg(long, short)]
    zone: String,
}

impl AddResource {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;
        coordinator.add_resource(Resource::new(
            &self.id,
            &self.name,
            self.kind,
            self.quantity,
            &self.unit,
            &self.zone,
        ))?;
        save(&coordinator, scenario)?;

        println!(
            "Added resource {} ({} {} of {} at {})",
            self.id, self.quantity, self.unit, self.kind, self.zone
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct AddTeam {
    /// Team id
    id: String,

    /// Human-readable name
    name: String,

    /// Team kind (search, medical, logistics, firefighting)
    #[arg(value_parser = parse_team_kind)]
    kind: TeamKind,

    /// Zone where the team is stationed
    #[arg(long, short)]
    zone: String,

    /// Maximum staffing
    #[arg(long, default_value_t = 10)]
    max_personnel: u32,

    /// Personnel to assign right away
    #[arg(long, short, default_value_t = 0)]
    personnel: u32,

    /// Team lead
    #[arg(long, default_value = "unassigned")]
    lead: String,

    /// Years of experience of the unit
    #[arg(long, default_value_t = 0)]
    experience: u32,
}

impl AddTeam {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;
        let mut team = RescueTeam::new(
            &self.id,
            &self.name,
            self.kind,
            &self.zone,
            self.max_personnel,
            &self.lead,
            self.experience,
        );
        if self.personnel > 0 && !team.assign_personnel(self.personnel) {
            anyhow::bail!(
                "Cannot staff team {} with {} people (maximum {})",
                self.id,
                self.personnel,
                self.max_personnel
            );
        }
        coordinator.add_team(team)?;
        save(&coordinator, scenario)?;

        println!("Added team {} ({}) at {}", self.id, self.kind, self.zone);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct AddUser {
    /// User id
    id: String,

    /// Full name
    name: String,

    /// Login name
    username: String,

    /// Role (admin, operator)
    #[arg(value_parser = parse_role)]
    role: Role,
}

impl AddUser {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;
        coordinator.add_user(User::new(&self.id, &self.name, &self.username, self.role))?;
        save(&coordinator, scenario)?;

        println!("Added user {} ({})", self.username, self.role);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Plan {
    /// Evacuation id
    id: String,

    /// Origin zone id
    origin: String,

    /// Destination zone id
    destination: String,

    /// Number of people to move
    people: u32,

    /// Urgency (low, medium, high, critical); defaults to the origin zone's
    /// risk level
    #[arg(long, short, value_parser = parse_level)]
    urgency: Option<Level>,

    /// Party responsible for the operation
    #[arg(long, short, default_value = "ops")]
    responsible: String,
}

impl Plan {
    #[instrument(skip(config))]
    fn run(self, config: &Config, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;
        let evacuation = coordinator.plan_evacuation(
            &self.id,
            &self.origin,
            &self.destination,
            self.people,
            self.urgency,
            &self.responsible,
        )?;
        if config.auto_reprioritize {
            coordinator.reprioritize();
        }
        save(&coordinator, scenario)?;

        println!(
            "Planned evacuation {} ({} → {}, {} people, urgency {}, score {})",
            evacuation.id(),
            evacuation.origin(),
            evacuation.destination(),
            evacuation.to_evacuate(),
            level_label(evacuation.urgency()),
            evacuation.priority_score()
        );
        if let Some(route) = evacuation.route() {
            println!("  Route: {} ({:.0} km, {:.1} h)", route.id, route.distance, route.travel_time);
        } else {
            println!("{}", "  No route connects the zones yet.".warning());
        }
        Ok(())
    }
}

#[instrument]
fn process(scenario: &Path) -> anyhow::Result<()> {
    let mut coordinator = load(scenario)?;
    match coordinator.process_next()? {
        Some(evacuation) => {
            save(&coordinator, scenario)?;
            println!(
                "{}",
                format!(
                    "✅ Processing {} ({} → {}, {} people)",
                    evacuation.id(),
                    evacuation.origin(),
                    evacuation.destination(),
                    evacuation.to_evacuate()
                )
                .success()
            );
        }
        None => println!("The evacuation queue is empty."),
    }
    Ok(())
}

#[derive(Debug, clap::Parser)]
pub struct Complete {
    /// Evacuation id
    id: String,

    /// Total number of people moved
    evacuated: u32,
}

impl Complete {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;
        let evacuation = coordinator.complete_evacuation(&self.id, self.evacuated)?;
        save(&coordinator, scenario)?;

        println!(
            "{}",
            format!(
                "✅ Completed {} ({} of {} people moved)",
                evacuation.id(),
                evacuation.evacuated(),
                evacuation.to_evacuate()
            )
            .success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct PathCommand {
    /// Origin zone id
    origin: String,

    /// Destination zone id
    destination: String,
}

impl PathCommand {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let coordinator = load(scenario)?;
        let path = coordinator.shortest_path(&self.origin, &self.destination);

        if path.is_empty() {
            println!(
                "{}",
                format!("No path from {} to {}.", self.origin, self.destination).warning()
            );
            return Ok(());
        }

        println!("Shortest path, {} stops:", path.len());
        for zone in path {
            println!(
                "  {} {} ({})",
                zone.id(),
                zone.name(),
                level_label(zone.risk_level())
            );
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct RouteCommand {
    /// Origin zone id
    origin: String,

    /// Destination zone id
    destination: String,

    /// Pick the lowest-risk route instead of the quickest
    #[arg(long)]
    safest: bool,
}

impl RouteCommand {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let coordinator = load(scenario)?;
        let route = if self.safest {
            coordinator.safest_route(&self.origin, &self.destination)
        } else {
            coordinator.fastest_route(&self.origin, &self.destination)
        };

        match route {
            Some(route) => {
                println!(
                    "{} route: {} ({} → {})",
                    if self.safest { "Safest" } else { "Fastest" },
                    route.id(),
                    route.origin(),
                    route.destination()
                );
                println!(
                    "  {:.0} km, {:.1} h by {}, risk {:.2}",
                    route.distance(),
                    route.travel_time_with_traffic(),
                    route.mode(),
                    route.risk_level()
                );
            }
            None => println!(
                "{}",
                format!("No route between {} and {}.", self.origin, self.destination).warning()
            ),
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Critical {
    /// How many zones to show (defaults to the configuration value)
    #[arg(long, short)]
    limit: Option<usize>,
}

impl Critical {
    #[instrument(skip(config))]
    fn run(self, config: &Config, scenario: &Path) -> anyhow::Result<()> {
        let coordinator = load(scenario)?;
        let limit = self.limit.unwrap_or(config.top_critical);

        let zones = coordinator.top_critical_zones(limit);
        if zones.is_empty() {
            println!("No zones registered.");
        } else {
            println!("Most critical zones:");
            for zone in zones {
                println!(
                    "  {} {} — {} affected, risk {}",
                    zone.id(),
                    zone.name(),
                    zone.affected_population(),
                    level_label(zone.risk_level())
                );
            }
        }

        let resources = coordinator.critical_resources();
        if !resources.is_empty() {
            println!();
            println!("{}", "Critical resources:".danger());
            for resource in resources {
                println!(
                    "  {} {} — {} of {} {} left",
                    resource.id(),
                    resource.name(),
                    resource.available(),
                    resource.total(),
                    resource.unit()
                );
            }
        }
        Ok(())
    }
}

#[instrument]
fn queue(scenario: &Path) -> anyhow::Result<()> {
    let coordinator = load(scenario)?;
    let mut pending = coordinator.pending_evacuations();

    if pending.is_empty() {
        println!("The evacuation queue is empty.");
        return Ok(());
    }

    pending.sort_by_key(|e| std::cmp::Reverse(e.priority_score()));

    println!("Pending evacuations ({}):", pending.len());
    println!("{:<12} {:<6} {:<10} {:<18} PEOPLE", "ID", "SCORE", "URGENCY", "ROUTE");
    for evacuation in &pending {
        println!(
            "{:<12} {:<6} {:<10} {:<18} {}",
            evacuation.id(),
            evacuation.priority_score(),
            level_label(evacuation.urgency()),
            evacuation
                .route()
                .map_or("-", |route| route.id.as_str()),
            evacuation.to_evacuate()
        );
    }
    Ok(())
}

#[derive(Debug, clap::Parser)]
pub struct AssignResource {
    /// Source resource id
    resource: String,

    /// Zone that receives the stock
    zone: String,

    /// Units to reserve and place
    quantity: u32,
}

impl AssignResource {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;
        let placed = coordinator.assign_resource_to_zone(&self.resource, &self.zone, self.quantity)?;
        save(&coordinator, scenario)?;

        println!(
            "{}",
            format!(
                "✅ Placed {} {} at {} (as {})",
                self.quantity,
                placed.unit(),
                self.zone,
                placed.id()
            )
            .success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct AssignTeam {
    /// Team id
    team: String,

    /// Zone the team deploys to
    zone: String,
}

impl AssignTeam {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;
        coordinator.assign_team_to_zone(&self.team, &self.zone)?;
        save(&coordinator, scenario)?;

        println!(
            "{}",
            format!("✅ Deployed team {} to {}", self.team, self.zone).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Associate {
    /// Resource id
    resource: String,

    /// Route id
    route: String,
}

impl Associate {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;
        coordinator.associate_resource_with_route(&self.resource, &self.route)?;
        save(&coordinator, scenario)?;

        println!("Associated {} with route {}", self.resource, self.route);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Tree {
    #[command(subcommand)]
    command: TreeCommand,
}

#[derive(Debug, clap::Parser)]
enum TreeCommand {
    /// Create a tree rooted with stock of a resource
    CreateRoot {
        /// Tree id
        tree: String,

        /// Resource the tree distributes
        resource: String,

        /// Stock held at the root
        quantity: u32,
    },

    /// Add a demand node under an existing node
    AddNode {
        /// Tree id
        tree: String,

        /// Node id
        node: String,

        /// Stock held at the node
        quantity: u32,

        /// Parent node id
        #[arg(long, short, default_value = "root")]
        parent: String,

        /// Priority weight for greedy allocation
        #[arg(long, default_value_t = 1)]
        priority: u32,
    },

    /// Show the total stock reachable from the root
    Total {
        /// Tree id
        tree: String,
    },

    /// Greedily distribute units across the tree's nodes
    Distribute {
        /// Tree id
        tree: String,

        /// Units to distribute
        quantity: u32,
    },
}

impl Tree {
    #[instrument]
    fn run(self, scenario: &Path) -> anyhow::Result<()> {
        let mut coordinator = load(scenario)?;

        match self.command {
            TreeCommand::CreateRoot {
                tree,
                resource,
                quantity,
            } => {
                coordinator.create_distribution_tree(&tree, &resource, quantity)?;
                save(&coordinator, scenario)?;
                println!("Created tree {tree} with {quantity} units of {resource}");
            }
            TreeCommand::AddNode {
                tree,
                node,
                quantity,
                parent,
                priority,
            } => {
                coordinator.add_distribution_node(&tree, &node, quantity, &parent, priority)?;
                save(&coordinator, scenario)?;
                println!("Added node {node} ({quantity} units, priority {priority}) under {parent}");
            }
            TreeCommand::Total { tree } => {
                let total = coordinator.distribution_total(&tree)?;
                println!("Tree {tree} holds {total} units");
            }
            TreeCommand::Distribute { tree, quantity } => {
                let allocations = coordinator.distribute(&tree, quantity)?;
                save(&coordinator, scenario)?;

                println!("Distributed {quantity} units across {} nodes:", allocations.len());
                for allocation in allocations {
                    println!("  {:<12} {}", allocation.node, allocation.assigned);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use evac_planner::{coordinator::Coordinator, domain::Zone, storage::Scenario};
    use tempfile::tempdir;

    use super::*;

    fn seeded_scenario(path: &Path) {
        let mut coordinator = Coordinator::new();
        coordinator
            .add_zone(Zone::new("Z1", "North", 0.0, 0.0, 8_000))
            .unwrap();
        coordinator
            .add_zone(Zone::new("Z2", "South", 3.0, 4.0, 100))
            .unwrap();
        coordinator
            .connect_zones("R1", "Z1", "Z2", 40.0, 1.0, TransportMode::Land)
            .unwrap();
        Scenario::capture(&coordinator).save(path).unwrap();
    }

    #[test]
    fn add_zone_persists_to_the_scenario_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("scenario.json");
        seeded_scenario(&path);

        let command = AddZone {
            id: "Z3".to_string(),
            name: "East".to_string(),
            x: 1.0,
            y: 1.0,
            population: 3_000,
        };
        command.run(&path).expect("add-zone should succeed");

        let coordinator = load(&path).unwrap();
        assert_eq!(coordinator.zone("Z3").unwrap().affected_population(), 3_000);
    }

    #[test]
    fn plan_and_process_round_trip_through_the_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("scenario.json");
        seeded_scenario(&path);

        let plan = Plan {
            id: "EV1".to_string(),
            origin: "Z1".to_string(),
            destination: "Z2".to_string(),
            people: 2_000,
            urgency: None,
            responsible: "ops".to_string(),
        };
        plan.run(&Config::default(), &path)
            .expect("plan should succeed");

        let coordinator = load(&path).unwrap();
        assert_eq!(coordinator.peek_next().unwrap().id(), "EV1");

        process(&path).expect("process should succeed");
        let coordinator = load(&path).unwrap();
        assert!(coordinator.peek_next().is_none());
        assert_eq!(coordinator.processed_evacuations().len(), 1);
    }

    #[test]
    fn duplicate_zone_surfaces_as_an_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("scenario.json");
        seeded_scenario(&path);

        let command = AddZone {
            id: "Z1".to_string(),
            name: "Again".to_string(),
            x: 0.0,
            y: 0.0,
            population: 0,
        };
        assert!(command.run(&path).is_err());
    }
}
