use actix_web::web;

pub mod account;
pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod club;
pub mod registration;

use crate::middleware::admin::StaffMiddleware;
use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login);

    // Account routes (require authentication)
    cfg.service(
        web::scope("/account")
            .wrap(AuthMiddleware)
            .service(account::get_my_player)
            .service(account::update_player)
            .service(account::submit_payment)
            .service(account::my_payments)
            .service(account::my_payment)
            .service(account::vote_player_of_match)
    );
    // Club management routes (staff and admins only)
    cfg.service(
        web::scope("/admin")
            .wrap(StaffMiddleware)
            .service(admin::create_team)
            .service(admin::update_team)
            .service(admin::delete_team)
            .service(admin::create_player)
            .service(admin::delete_player)
            .service(admin::player_debug)
            .service(admin::create_tournament)
            .service(admin::set_tournament_teams)
            .service(admin::delete_tournament)
            .service(admin::create_match)
            .service(admin::record_result)
            .service(admin::upsert_statistics)
            .service(admin::clear_statistics_relation)
            .service(admin::issue_card)
            .service(admin::void_card)
            .service(admin::create_payment)
            .service(admin::list_payments)
            .service(admin::payment_dashboard)
            .service(admin::get_payment)
            .service(admin::approve_payment)
            .service(admin::reject_payment)
            .service(admin::archive_payment)
            .service(admin::unarchive_payment)
    );
    // Public club data
    cfg.service(club::list_teams)
        .service(club::get_team)
        .service(club::list_players)
        .service(club::get_player)
        .service(club::get_player_cards)
        .service(club::list_tournaments)
        .service(club::get_tournament)
        .service(club::get_standings)
        .service(club::get_tournament_player_stats)
        .service(club::list_results)
        .service(club::get_match)
        .service(club::get_match_statistics)
        .service(club::get_match_player_stats)
        .service(club::get_match_cards)
        .service(club::get_match_card_counts)
        .service(club::get_card)
        .service(club::get_club_overview);
}
