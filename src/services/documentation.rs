use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the sales leaderboard backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::websocket::ws_handler,
        crate::routes::auth::login,
        crate::routes::auth::register_employee,
        crate::routes::auth::me,
        crate::routes::stats::leaderboard,
        crate::routes::stats::list_teams,
        crate::routes::tl::list_agents,
        crate::routes::tl::create_agent,
        crate::routes::tl::increment,
        crate::routes::tl::set_target,
        crate::routes::tl::delete_agent,
        crate::routes::tl::my_team,
        crate::routes::tl::update_team,
        crate::routes::tl::list_leaves,
        crate::routes::tl::decide_leave,
        crate::routes::admin::push_notification,
        crate::routes::admin::clear_notification,
        crate::routes::admin::update_settings,
        crate::routes::admin::list_teams,
        crate::routes::admin::delete_team,
        crate::routes::admin::create_tl,
        crate::routes::admin::list_leaves,
        crate::routes::admin::decide_leave,
        crate::routes::bookings::list_bookings,
        crate::routes::bookings::create_booking,
        crate::routes::bookings::delete_booking,
        crate::routes::leaves::create_leave,
        crate::routes::leaves::list_leaves,
        crate::routes::employee::performance,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::auth::LoginRequest,
            crate::dto::auth::LoginResponse,
            crate::dto::auth::UserView,
            crate::dto::auth::RegisterEmployeeRequest,
            crate::dto::auth::CreateTlRequest,
            crate::dto::leaderboard::LeaderboardSnapshot,
            crate::dto::leaderboard::TeamStanding,
            crate::dto::leaderboard::AgentStanding,
            crate::dto::leaderboard::TopStats,
            crate::dto::leaderboard::TopStatEntry,
            crate::dto::leaderboard::CelebrationEvent,
            crate::dto::tl::AgentView,
            crate::dto::tl::CreateAgentRequest,
            crate::dto::tl::IncrementRequest,
            crate::dto::tl::IncrementResponse,
            crate::dto::tl::TargetRequest,
            crate::dto::tl::TeamView,
            crate::dto::tl::UpdateTeamRequest,
            crate::dto::admin::NotificationPush,
            crate::dto::admin::ActiveNotification,
            crate::dto::admin::SettingsView,
            crate::dto::admin::UpdateSettingsRequest,
            crate::dto::admin::TeamOverview,
            crate::dto::admin::ActionResponse,
            crate::dto::booking::CreateBookingRequest,
            crate::dto::booking::BookingView,
            crate::dto::leave::CreateLeaveRequest,
            crate::dto::leave::LeaveDecisionRequest,
            crate::dto::leave::LeaveView,
            crate::dto::employee::HistoryView,
            crate::dto::employee::PerformanceResponse,
            crate::dto::ws::ClientMessage,
            crate::dto::ws::ServerMessage,
            crate::dto::ws::CounterMutation,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "realtime", description = "WebSocket entry point for live leaderboard clients"),
        (name = "auth", description = "Login and account creation"),
        (name = "stats", description = "Public leaderboard reads"),
        (name = "tl", description = "Team-leader agent and team management"),
        (name = "admin", description = "Notifications, settings and team administration"),
        (name = "bookings", description = "Conference slot bookings"),
        (name = "leaves", description = "Leave requests and approvals"),
        (name = "employee", description = "Per-agent performance reads"),
    )
)]
pub struct ApiDoc;
