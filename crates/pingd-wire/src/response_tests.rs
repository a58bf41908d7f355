// SPDX-License-Identifier: MIT

use super::*;

#[yare::parameterized(
    ok                  = { Response::Ok, "OK\n" },
    failed              = { Response::Failed, "failed\n" },
    duplicate_id        = { Response::ErrorDuplicateId, "ERROR DUPLICATE ID\n" },
    duplicate_request   = { Response::ErrorDuplicateRequest, "ERROR DUPLICATE REQUEST\n" },
    no_server           = { Response::ErrorNoServer, "ERROR NO SERVER\n" },
    already_defunct     = { Response::ErrorAlreadyDefunct, "ERROR ALREADY DEFUNCT\n" },
    disconnecting       = { Response::Disconnecting, "DISCONNECTING\n" },
    shutting_down       = { Response::ShuttingDown, "SHUTTING DOWN\n" },
)]
fn formats_fixed_responses(response: Response, expected: &str) {
    assert_eq!(response.to_line(), expected);
}

#[test]
fn error_echoes_original_line() {
    let response = Response::Error("A seven host.example".to_string());
    assert_eq!(response.to_line(), "ERROR A seven host.example\n");
}

#[test]
fn noping_includes_id_and_name() {
    let response = Response::Noping { id: HostId::new(7).unwrap(), name: "host.example".to_string() };
    assert_eq!(response.to_line(), "NOPING 7 host.example\n");
}
