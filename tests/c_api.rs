use bounce_sandbox::Segment;
use bounce_sandbox::c_api::*;
use bounce_sandbox::{Cursor, Vec2};

#[test]
fn handle_lifecycle_and_population() {
    let handle = Sandbox_CreateWithSeed(800.0, 600.0, 4);
    assert!(!handle.is_null());

    unsafe {
        assert_eq!(Sandbox_GetBodyCount(handle), 1);

        let mut spawned = 0;
        while Sandbox_Spawn(handle) != 0 {
            spawned += 1;
        }
        assert_eq!(spawned, 29);
        assert_eq!(Sandbox_GetBodyCount(handle), 30);

        // Nothing selected: the oldest goes first.
        let first_id = (*Sandbox_GetBodies(handle)).id;
        assert_eq!(Sandbox_Remove(handle, 0), first_id);
        assert_eq!(Sandbox_GetBodyCount(handle), 29);

        Sandbox_Destroy(handle);
    }
}

#[test]
fn rejects_empty_canvas() {
    assert!(Sandbox_Create(0.0, 600.0).is_null());
    assert!(Sandbox_Create(800.0, f32::NAN).is_null());
}

#[test]
fn null_handle_is_inert() {
    let null = std::ptr::null_mut();
    unsafe {
        assert_eq!(Sandbox_Frame(null, 16.0), 0.0);
        assert_eq!(Sandbox_Spawn(null), 0);
        assert_eq!(Sandbox_GetBodyCount(null), 0);
        assert!(Sandbox_GetBodies(null).is_null());
        assert_eq!(Sandbox_PointerDown(null, 1.0, 1.0), Cursor::Default);
        assert!(!Sandbox_SetVelocity(null, 1, 1.0, 1.0));
        Sandbox_Destroy(null);
    }
}

#[test]
fn drag_and_throw_through_the_abi() {
    let handle = Sandbox_CreateWithSeed(800.0, 600.0, 4);
    unsafe {
        Sandbox_SetPaused(handle, false);
        Sandbox_Frame(handle, 0.0);

        let body = *Sandbox_GetBodies(handle);
        assert_eq!(Sandbox_HitTest(handle, body.pos.x, body.pos.y), body.id);
        assert_eq!(Sandbox_PointerMove(handle, body.pos.x, body.pos.y), Cursor::Grab);
        Sandbox_Frame(handle, 16.0);

        let body = *Sandbox_GetBodies(handle);
        assert_eq!(Sandbox_PointerDown(handle, body.pos.x, body.pos.y), Cursor::Grabbing);
        assert_eq!(Sandbox_GetSelected(handle), body.id);

        Sandbox_PointerMove(handle, 300.0, 200.0);
        Sandbox_Frame(handle, 32.0);
        let held = *Sandbox_GetBodies(handle);
        assert_eq!(held.pos, Vec2::new(300.0, 200.0));
        assert!(held.held);

        assert_eq!(Sandbox_PointerUp(handle), Cursor::Grab);
        assert!(!(*Sandbox_GetBodies(handle)).held);

        assert!(Sandbox_SetVelocity(handle, held.id, 1.0, -2.0));
        assert_eq!((*Sandbox_GetBodies(handle)).vel, Vec2::new(50.0, -100.0));

        Sandbox_Destroy(handle);
    }
}

#[test]
fn spokes_are_written_for_valid_index_only() {
    let handle = Sandbox_CreateWithSeed(800.0, 600.0, 4);
    let mut out = [Segment {
        from: Vec2::zero(),
        to: Vec2::zero(),
    }; 4];
    unsafe {
        assert!(Sandbox_GetSpokes(handle, 0, out.as_mut_ptr()));
        assert_eq!(out[0].from, Vec2::new(100.0, 100.0));
        assert_eq!(out[0].to, Vec2::new(100.0, 50.0));

        assert!(!Sandbox_GetSpokes(handle, 5, out.as_mut_ptr()));
        assert!(!Sandbox_GetSpokes(handle, 0, std::ptr::null_mut()));

        Sandbox_Destroy(handle);
    }
}
